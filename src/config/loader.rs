//! Configuration loading from disk, and mapper assembly from a loaded config.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::schema::UrlmapConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::mapping::error::MappingError;
use crate::mapping::mapper::{Mapper, MapperOptions};
use crate::resource::tree::Tree;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Mapping(MappingError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Mapping(e) => write!(f, "Mapping error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Mapping(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<MappingError> for ConfigError {
    fn from(e: MappingError) -> Self {
        ConfigError::Mapping(e)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<UrlmapConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<UrlmapConfig, ConfigError> {
    let config: UrlmapConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a mapper from `config`.
///
/// The tree, when given, is mapped first; tables, statics and aliases follow
/// in that order, so aliases may target any of them. Relative table paths
/// are resolved against `base_dir`.
pub fn build_mapper(
    config: &UrlmapConfig,
    base_dir: &Path,
    tree: Option<Arc<Tree>>,
) -> Result<Mapper, ConfigError> {
    let mut mapper = Mapper::new(MapperOptions::from(&config.mapper));
    if let Some(tree) = tree {
        mapper.initialize(tree)?;
    }

    for table in &config.tables {
        let path = base_dir.join(table);
        let content = fs::read_to_string(&path).map_err(ConfigError::Io)?;
        tracing::debug!(path = %path.display(), "loading mapping table");
        mapper.load_table(content.lines())?;
    }

    for entry in &config.statics {
        mapper.add_static_with_defaults(&entry.id, &entry.pattern, entry.defaults.clone())?;
    }

    for alias in &config.aliases {
        mapper.add_alias(&alias.id, &alias.target)?;
    }

    tracing::info!(mappings = mapper.len(), "mapper built from configuration");
    Ok(mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::params::Params;

    const SAMPLE: &str = r#"
[mapper]
root_location = "/app"

[dispatch]
max_internal_redirects = 8

[[statics]]
id = "@@Stylesheet"
pattern = "style.css"

[[statics]]
id = "@@UserHome"
pattern = "/users/(user)/home"
defaults = { user = "guest" }

[[aliases]]
id = "@@Sheet"
target = "@@Stylesheet"
"#;

    #[test]
    fn test_parse_and_build() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.dispatch.max_internal_redirects, Some(8));
        assert_eq!(config.mapper.naming_prefix, "@@");

        let mapper = build_mapper(&config, Path::new("."), None).unwrap();
        assert_eq!(mapper.render("@@Sheet", Params::new()).unwrap(), "/app/style.css");
        assert_eq!(mapper.render("@@UserHome", Params::new()).unwrap(), "/users/guest/home");
    }

    #[test]
    fn test_unknown_alias_target() {
        let config = parse_config(
            r#"
[[aliases]]
id = "@@A"
target = "@@Nothing"
"#,
        )
        .unwrap();
        assert!(matches!(
            build_mapper(&config, Path::new("."), None),
            Err(ConfigError::Mapping(MappingError::UnknownAlias { .. }))
        ));
    }

    #[test]
    fn test_invalid_config_reports_validation() {
        let err = parse_config("[mapper]\nroot_location = \"app\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/urlmap.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
