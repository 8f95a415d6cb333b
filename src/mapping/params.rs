//! Arguments for backward mapping.
//!
//! ```ignore
//! mapper.render("@@PrintName", Params::new().arg("martin"))?;
//! mapper.render("@@PrintUsername", Params::new().named("username", "martin"))?;
//! mapper.render("@@Context1", Params::from_source(&user).named("user", "rachel"))?;
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::mapping::error::RenderError;
use crate::mapping::value::Value;

/// Anything that can supply values by variable name.
pub trait ParamSource {
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl<V: Clone + Into<Value>> ParamSource for HashMap<String, V> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl<V: Clone + Into<Value>> ParamSource for BTreeMap<String, V> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl ParamSource for serde_json::Map<String, serde_json::Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).and_then(Value::from_json)
    }
}

impl ParamSource for serde_json::Value {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).and_then(Value::from_json)
    }
}

enum Source<'a> {
    Borrowed(&'a dyn ParamSource),
    Owned(serde_json::Map<String, serde_json::Value>),
}

impl Source<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        match self {
            Source::Borrowed(source) => source.lookup(name),
            Source::Owned(map) => map.lookup(name),
        }
    }
}

/// Positional values, named values, and an optional source object.
#[derive(Default)]
pub struct Params<'a> {
    pub(crate) positional: Vec<Value>,
    pub(crate) named: BTreeMap<String, Value>,
    source: Option<Source<'a>>,
}

impl<'a> Params<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill missing values from `source`; named values still take priority.
    pub fn from_source(source: &'a dyn ParamSource) -> Self {
        Self {
            source: Some(Source::Borrowed(source)),
            ..Self::default()
        }
    }

    /// Use the fields of any serializable value as the source.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RenderError> {
        let map = match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Ok(Self {
            source: Some(Source::Owned(map)),
            ..Self::default()
        })
    }

    /// Append a positional value (filled root to leaf).
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub(crate) fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn lookup_source(&self, name: &str) -> Option<Value> {
        self.source.as_ref().and_then(|s| s.lookup(name))
    }
}
