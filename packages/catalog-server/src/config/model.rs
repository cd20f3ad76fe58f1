use std::path::{Path, PathBuf};

use catalog_core::FieldDefinition;
use serde::{Deserialize, Serialize};

/// Root of the configuration file: `{ "datasets": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub datasets: Vec<DatasetConfig>,
}

/// One dataset entry as written in the configuration file.
///
/// Unknown keys are ignored. Limits stay signed here so that a non-positive
/// value is reported by validation rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// CSV file backing the dataset. Relative paths resolve against the
    /// configuration file's directory.
    pub path: String,
    pub fields: Vec<FieldDefinition>,
    pub key_field: String,
    pub lookup_keys: Vec<String>,
    pub visible_fields: Vec<String>,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl DatasetConfig {
    /// CSV path, resolved against `base_dir` when relative.
    #[must_use]
    pub fn resolve_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}
