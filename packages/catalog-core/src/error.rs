//! Error taxonomy shared by the query path and configuration loading.

use std::path::PathBuf;

/// Errors raised while answering a query or lookup.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// No dataset with this identifier exists in the active catalog.
    #[error("Dataset not found: '{dataset_id}'")]
    DatasetNotFound { dataset_id: String },

    /// A filter or field selection names a field the schema does not declare.
    /// Carries every valid field name so the caller can correct the request.
    #[error("Invalid field: '{field}'. Valid fields are: {}", valid_fields.join(", "))]
    InvalidField {
        field: String,
        valid_fields: Vec<String>,
    },

    /// A filter tree carries an operator outside `eq`/`contains`/`and`.
    #[error("Unsupported filter operator: '{op}'. Supported operators: eq, contains, and")]
    UnsupportedOperator { op: String },

    /// The storage backend failed; passed through unchanged.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl QueryError {
    pub fn dataset_not_found(dataset_id: impl Into<String>) -> Self {
        Self::DatasetNotFound {
            dataset_id: dataset_id.into(),
        }
    }
}

/// Errors raised while loading or validating the dataset configuration.
///
/// Fatal at startup; at reload time the candidate is discarded and the
/// previously active configuration keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, or JSON that does not have the configuration's shape.
    #[error("Failed to parse configuration from '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A rule spanning the whole configuration (e.g. duplicate dataset ids).
    #[error("Configuration error: {0}")]
    Invalid(String),

    /// A rule violated by one dataset definition.
    #[error("Dataset '{dataset_id}': {message}")]
    Dataset { dataset_id: String, message: String },
}

impl ConfigError {
    pub fn dataset(dataset_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dataset {
            dataset_id: dataset_id.into(),
            message: message.into(),
        }
    }
}
