use std::fmt;

use catalog_core::QueryError;
use serde::Serialize;

use super::filter::FilterParseError;
use crate::catalog::LifecycleState;

/// Wire-level error class reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    ServerError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by tool calls.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterParseError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: '{name}'")]
    UnknownTool { name: String },

    #[error("Catalog is not serving (state: {state})")]
    NotReady { state: LifecycleState },

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl OperationError {
    /// Wire error class for this failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            OperationError::Query(QueryError::DatasetNotFound { .. })
            | OperationError::UnknownTool { .. } => ErrorCode::NotFound,
            OperationError::Query(
                QueryError::InvalidField { .. } | QueryError::UnsupportedOperator { .. },
            )
            | OperationError::InvalidFilter(_)
            | OperationError::InvalidArguments(_) => ErrorCode::InvalidRequest,
            OperationError::Query(QueryError::Storage(_))
            | OperationError::NotReady { .. }
            | OperationError::Encode(_) => ErrorCode::ServerError,
        }
    }
}
