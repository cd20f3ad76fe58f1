//! In-memory [`DatasetStorage`] implementation.
//!
//! [`InMemoryStorage`] serves rows from vectors held in memory. Useful for
//! tests and for embedding the query engine over data that is already loaded.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::catalog::DatasetCatalog;
use crate::error::QueryError;
use crate::schema::DatasetSchema;
use crate::traits::DatasetStorage;
use crate::types::{Row, Value};

/// Storage over in-memory rows, keyed by dataset id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    schemas: Vec<DatasetSchema>,
    rows: HashMap<String, Vec<Row>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset with its rows. Replaces any dataset with the same id.
    #[must_use]
    pub fn with_dataset(mut self, schema: DatasetSchema, rows: Vec<Row>) -> Self {
        self.schemas.retain(|s| s.id != schema.id);
        self.rows.insert(schema.id.clone(), rows);
        self.schemas.push(schema);
        self
    }

    /// Catalog over this storage's schemas.
    #[must_use]
    pub fn catalog(&self) -> DatasetCatalog {
        DatasetCatalog::new(self.schemas.iter().cloned())
    }

    fn dataset(&self, dataset_id: &str) -> Result<(&DatasetSchema, &[Row]), QueryError> {
        let schema = self
            .schemas
            .iter()
            .find(|s| s.id == dataset_id)
            .ok_or_else(|| QueryError::dataset_not_found(dataset_id))?;
        let rows = self.rows.get(dataset_id).map_or(&[][..], Vec::as_slice);
        Ok((schema, rows))
    }
}

#[async_trait]
impl DatasetStorage for InMemoryStorage {
    fn list_schemas(&self) -> Vec<DatasetSchema> {
        self.schemas.clone()
    }

    async fn load_dataset(&self, dataset_id: &str) -> Result<Vec<Row>, QueryError> {
        let (_, rows) = self.dataset(dataset_id)?;
        Ok(rows.to_vec())
    }

    async fn load_by_id(&self, dataset_id: &str, key: &Value) -> Result<Option<Row>, QueryError> {
        let (schema, rows) = self.dataset(dataset_id)?;
        Ok(rows
            .iter()
            .find(|row| {
                row.get(&schema.key_field)
                    .is_some_and(|cell| cell.matches_key(key))
            })
            .cloned())
    }
}
