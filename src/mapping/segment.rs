//! Path segment descriptors.

use crate::mapping::error::MappingError;
use crate::mapping::format::Format;
use crate::mapping::value::Value;

/// A named variable: either a path component that consumes one segment or
/// an optional (query-style) parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    default: Option<Value>,
    format: Option<Format>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            format: None,
        }
    }

    /// Shorthand for a variable with a parsed format, e.g. `("uid", "%08d")`.
    pub fn formatted(name: impl Into<String>, spec: &str) -> Result<Self, MappingError> {
        Ok(Self::new(name).with_format(Format::parse(spec)?))
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    /// Human-readable placeholder: `(name)` or `(name%fmt)`.
    pub fn placeholder(&self) -> String {
        match &self.format {
            Some(format) => format!("({}{})", self.name, format),
            None => format!("({})", self.name),
        }
    }

    /// Render a value for this variable, honouring its format.
    pub fn render(&self, value: &Value) -> Option<String> {
        match &self.format {
            Some(format) => format.apply(value),
            None => Some(value.to_string()),
        }
    }

    /// Convert a decoded component back to a value, or `None` if it does
    /// not fit the format.
    pub fn try_coerce(&self, raw: &str) -> Option<Value> {
        match &self.format {
            Some(format) => format.try_coerce(raw),
            None => (!raw.is_empty()).then(|| Value::from(raw)),
        }
    }

    pub(crate) fn capture_class(&self) -> &'static str {
        self.format.as_ref().map_or("[^/]+", Format::capture_class)
    }
}

/// One component of a URL path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A literal that must match exactly.
    Fixed(String),
    /// A variable consuming exactly one component.
    Var(Variable),
}

impl Segment {
    pub fn fixed(literal: impl Into<String>) -> Self {
        Segment::Fixed(literal.into())
    }

    pub fn variable(&self) -> Option<&Variable> {
        match self {
            Segment::Var(var) => Some(var),
            Segment::Fixed(_) => None,
        }
    }
}
