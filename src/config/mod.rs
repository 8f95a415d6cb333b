//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → UrlmapConfig (validated, immutable)
//!     → loader.rs build_mapper (tree + tables + statics + aliases)
//!     → Mapper, published to the Dispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a rebuilt mapper
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_mapper, load_config, parse_config, ConfigError};
pub use schema::{
    AliasConfig, DispatchConfig, LogFormat, MapperConfig, ObservabilityConfig, StaticConfig,
    UrlmapConfig,
};
