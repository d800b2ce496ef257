//! Configuration loading pipeline: read file, parse YAML, validate,
//! freeze in an `Arc`.

use std::path::Path;
use std::sync::Arc;

use crate::error::{ConfigError, Severity};

use super::schema::AppConfig;
use super::validation;

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if the file cannot be read,
/// [`ConfigError::ParseError`] on malformed YAML, and
/// [`ConfigError::ValidationError`] when validation finds errors.
/// Warnings are logged and do not fail the load.
pub fn load_config(path: &Path) -> Result<Arc<AppConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;

    let config: AppConfig =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let issues = validation::validate(&config);
    let (errors, warnings): (Vec<_>, Vec<_>) = issues
        .into_iter()
        .partition(|issue| issue.severity == Severity::Error);

    for warning in warnings {
        tracing::warn!(path = %warning.path, "{}", warning.message);
    }

    if errors.is_empty() {
        Ok(Arc::new(config))
    } else {
        Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors,
        })
    }
}

/// Loads the file when a path is given, otherwise returns defaults.
///
/// # Errors
///
/// Propagates [`load_config`] errors for the given path.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Arc<AppConfig>, ConfigError> {
    path.map_or_else(|| Ok(Arc::new(AppConfig::default())), load_config)
}
