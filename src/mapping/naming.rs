//! Derivation of resource-ids from type names.

use std::fmt;
use std::sync::Arc;

/// Default prefix, easy to grep for in templates and code.
pub const DEFAULT_PREFIX: &str = "@@";

/// Pure function `type name -> resource-id`, owned by one mapper.
#[derive(Clone)]
pub enum NamingTransform {
    /// Prepend a fixed marker to the type name.
    Prefix(String),
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NamingTransform {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        NamingTransform::Custom(Arc::new(f))
    }

    pub fn resource_id(&self, type_name: &str) -> String {
        match self {
            NamingTransform::Prefix(prefix) => format!("{}{}", prefix, type_name),
            NamingTransform::Custom(f) => f(type_name),
        }
    }
}

impl Default for NamingTransform {
    fn default() -> Self {
        NamingTransform::Prefix(DEFAULT_PREFIX.to_string())
    }
}

impl fmt::Debug for NamingTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingTransform::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            NamingTransform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        assert_eq!(NamingTransform::default().resource_id("Home"), "@@Home");
    }

    #[test]
    fn test_custom() {
        let naming = NamingTransform::custom(|name| name.to_lowercase());
        assert_eq!(naming.resource_id("PrintName"), "printname");
    }
}
