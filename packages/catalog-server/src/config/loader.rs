use std::path::Path;

use catalog_core::ConfigError;
use tracing::debug;

use super::model::ProjectConfig;
use super::validate::validate_project;

/// Reads, parses, and checks the project-level rules of a configuration file.
///
/// Per-dataset rules are checked when schemas are built from the result.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] for malformed JSON or a wrong shape, and
/// [`ConfigError::Invalid`] for project-level rule violations.
pub fn load_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ProjectConfig =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_project(&config)?;
    debug!(path = %path.display(), datasets = config.datasets.len(), "configuration parsed");
    Ok(config)
}
