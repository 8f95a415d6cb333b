//! Mapping error types.

use thiserror::Error;

/// Result type for table construction.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Errors raised while building the mapping table.
///
/// These are always construction errors: they surface when the tree is
/// initialized or a static/alias mapping is registered, never at request time.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Two mappings resolved to the same resource-id.
    #[error("duplicate resource id '{id}':\n  existing mapping: {existing}\n  new mapping     : {attempted}")]
    DuplicateId {
        id: String,
        existing: String,
        attempted: String,
    },

    /// A node declared itself servable more than once.
    #[error("resource '{resource}' is declared twice as a leaf")]
    DuplicateLeaf { resource: String },

    /// The same variable name appears twice along one path.
    #[error("variable name collision on '{name}' in mapping '{id}'")]
    VariableCollision { id: String, name: String },

    /// A URL pattern could not be parsed.
    #[error("invalid URL pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A rendering format could not be parsed.
    #[error("invalid format '{spec}'")]
    InvalidFormat { spec: String },

    /// Defaults were given for variables the pattern does not declare.
    #[error("defaults for unknown variables in pattern '{pattern}': {names:?}")]
    ExtraDefaults { pattern: String, names: Vec<String> },

    /// An alias points at a resource-id that has no mapping.
    #[error("target mapping '{target}' must exist for alias '{alias}'")]
    UnknownAlias { alias: String, target: String },

    /// A folder names a default child it does not contain.
    #[error("folder default child '{name}' not found")]
    MissingDefaultChild { name: String },

    /// A branch references a node that is not part of the tree.
    #[error("resource '{resource}' references unknown node #{node}")]
    UnknownNode { resource: String, node: usize },

    /// A serialized table line is not of the form `id : pattern`.
    #[error("cannot parse table line '{line}'")]
    InvalidTableLine { line: String },
}

/// Errors raised by backward mapping.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid resource-id '{id}'")]
    UnknownId { id: String },

    #[error("resource '{id}' takes at most {max} positional arguments")]
    TooManyArguments { id: String, max: usize },

    #[error("'{name}' is not a valid component key for mapping the '{id}' resource")]
    UnknownParameter { id: String, name: String },

    #[error("creating URL for '{id}', got multiple values for component '{name}'")]
    DuplicateValue { id: String, name: String },

    #[error("resource '{id}': positional arguments cannot be combined with a source object")]
    SourceWithPositional { id: String },

    #[error("missing values attempting to map resource '{id}': {}", .names.join(", "))]
    Missing { id: String, names: Vec<String> },

    #[error("value '{value}' for '{name}' cannot be rendered with format '%{format}'")]
    BadValue {
        name: String,
        value: String,
        format: String,
    },

    #[error("cannot convert source object: {0}")]
    Source(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn unknown_id(id: impl Into<String>) -> Self {
        Self::UnknownId { id: id.into() }
    }
}
