//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that ids are well-formed and unique
//! - Validate value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UrlmapConfig → Result<(), Vec<ValidationError>>
//! - Pattern syntax and alias targets are checked when the mapper is built,
//!   since tree ids are only known then

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::UrlmapConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check `config`, collecting every error.
pub fn validate_config(config: &UrlmapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(root) = &config.mapper.root_location {
        if !root.starts_with('/') {
            errors.push(ValidationError::new(
                "mapper.root_location",
                "must start with '/'",
            ));
        }
        if root.len() > 1 && root.ends_with('/') {
            errors.push(ValidationError::new(
                "mapper.root_location",
                "must not end with '/'",
            ));
        }
        if root == "/" {
            errors.push(ValidationError::new(
                "mapper.root_location",
                "use no root location instead of '/'",
            ));
        }
    }

    if config.mapper.naming_prefix.is_empty() {
        errors.push(ValidationError::new("mapper.naming_prefix", "must not be empty"));
    }

    if config.dispatch.max_internal_redirects == Some(0) {
        errors.push(ValidationError::new(
            "dispatch.max_internal_redirects",
            "must be greater than zero",
        ));
    }

    let mut seen = HashSet::new();
    let ids = config
        .statics
        .iter()
        .enumerate()
        .map(|(i, s)| (format!("statics[{i}].id"), s.id.as_str()))
        .chain(
            config
                .aliases
                .iter()
                .enumerate()
                .map(|(i, a)| (format!("aliases[{i}].id"), a.id.as_str())),
        );
    for (field, id) in ids {
        if id.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if id.contains(char::is_whitespace) || id.contains(':') {
            errors.push(ValidationError::new(field, "must not contain whitespace or ':'"));
        } else if !seen.insert(id) {
            errors.push(ValidationError::new(field, format!("duplicate id '{id}'")));
        }
    }

    for (i, s) in config.statics.iter().enumerate() {
        if s.pattern.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("statics[{i}].pattern"),
                "must not be empty",
            ));
        }
    }

    for (i, a) in config.aliases.iter().enumerate() {
        if a.target.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("aliases[{i}].target"),
                "must not be empty",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
