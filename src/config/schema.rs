//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::mapping::naming::DEFAULT_PREFIX;
use crate::mapping::value::Value;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UrlmapConfig {
    /// Serialized tables (`resource-id : pattern` lines) to load. Relative
    /// paths are resolved against the config file's directory.
    pub tables: Vec<PathBuf>,

    /// Mapper settings.
    pub mapper: MapperConfig,

    /// Dispatch settings.
    pub dispatch: DispatchConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Explicit URL patterns.
    pub statics: Vec<StaticConfig>,

    /// Additional ids for existing mappings.
    pub aliases: Vec<AliasConfig>,
}

/// Mapper settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Location the tree is served under (e.g., "/app").
    pub root_location: Option<String>,

    /// Prefix prepended to type names to form resource-ids.
    pub naming_prefix: String,

    /// Append "/" when rendering non-terminal mappings.
    pub render_trailing: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            root_location: None,
            naming_prefix: DEFAULT_PREFIX.to_string(),
            render_trailing: true,
        }
    }
}

/// Dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Internal redirect ceiling per request; absent means unbounded.
    pub max_internal_redirects: Option<usize>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// A mapping registered from an explicit URL pattern.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticConfig {
    /// Resource-id.
    pub id: String,

    /// URL pattern, e.g. "/users/(username)/home".
    pub pattern: String,

    /// Default values for variables of the pattern.
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
}

/// An alias for an existing mapping.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AliasConfig {
    /// New resource-id.
    pub id: String,

    /// Existing resource-id.
    pub target: String,
}
