//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line values layered over the file on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replaces `redirect.endpoint`.
    pub endpoint: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut EdgeConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.redirect.endpoint = endpoint.clone();
        }
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EdgeConfig, ConfigError> {
    parse_with_overrides(content, &Overrides::default())
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    load_with_overrides(Some(path), &Overrides::default())
}

/// Load `path` (or the defaults), apply `overrides`, then validate the
/// result. Validation sees the final values, so a bad endpoint in the file
/// is fine as long as an override replaces it.
pub fn load_with_overrides(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<EdgeConfig, ConfigError> {
    match path {
        Some(path) => parse_with_overrides(&fs::read_to_string(path)?, overrides),
        None => finish(EdgeConfig::default(), overrides),
    }
}

fn parse_with_overrides(content: &str, overrides: &Overrides) -> Result<EdgeConfig, ConfigError> {
    finish(toml::from_str(content)?, overrides)
}

fn finish(mut config: EdgeConfig, overrides: &Overrides) -> Result<EdgeConfig, ConfigError> {
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
