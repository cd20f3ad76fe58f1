use async_trait::async_trait;

use crate::error::QueryError;
use crate::schema::DatasetSchema;
use crate::types::{Row, Value};

/// Source of dataset rows.
///
/// Rows are fetched fresh on every call; implementations keep no row cache
/// that the query path depends on. Implementations: CSV files (server),
/// memory (tests and embedding).
#[async_trait]
pub trait DatasetStorage: Send + Sync {
    /// All dataset schemas this storage knows about.
    fn list_schemas(&self) -> Vec<DatasetSchema>;

    /// Load every row of a dataset, in storage order.
    ///
    /// Fails with [`QueryError::DatasetNotFound`] for an unknown id.
    async fn load_dataset(&self, dataset_id: &str) -> Result<Vec<Row>, QueryError>;

    /// Load the row whose key field matches `key`, if any.
    ///
    /// Fails with [`QueryError::DatasetNotFound`] for an unknown id.
    async fn load_by_id(&self, dataset_id: &str, key: &Value) -> Result<Option<Row>, QueryError>;
}
