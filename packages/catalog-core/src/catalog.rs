//! In-memory registry of validated dataset schemas.

use std::collections::HashMap;

use crate::error::QueryError;
use crate::schema::DatasetSchema;

/// Identifier-keyed registry of dataset schemas.
///
/// Built once per configuration generation and read-only afterwards. There is
/// no update method: a reload builds a new catalog and swaps it in whole.
/// Listing preserves the order in which schemas were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCatalog {
    schemas: Vec<DatasetSchema>,
    index: HashMap<String, usize>,
}

impl DatasetCatalog {
    /// Builds a catalog. A repeated id replaces the earlier schema in its slot.
    #[must_use]
    pub fn new(schemas: impl IntoIterator<Item = DatasetSchema>) -> Self {
        let mut catalog = Self::default();
        for schema in schemas {
            match catalog.index.get(&schema.id) {
                Some(&slot) => catalog.schemas[slot] = schema,
                None => {
                    catalog.index.insert(schema.id.clone(), catalog.schemas.len());
                    catalog.schemas.push(schema);
                }
            }
        }
        catalog
    }

    /// Returns the schema for `dataset_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DatasetNotFound`] if no such dataset exists.
    pub fn get_schema(&self, dataset_id: &str) -> Result<&DatasetSchema, QueryError> {
        self.index
            .get(dataset_id)
            .map(|&slot| &self.schemas[slot])
            .ok_or_else(|| QueryError::dataset_not_found(dataset_id))
    }

    /// All schemas, in supply order.
    #[must_use]
    pub fn list_schemas(&self) -> &[DatasetSchema] {
        &self.schemas
    }

    #[must_use]
    pub fn has_dataset(&self, dataset_id: &str) -> bool {
        self.index.contains_key(dataset_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
