//! One immutable generation of the served configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catalog_core::{
    ConfigError, DatasetCatalog, DatasetSchema, DatasetStorage, QueryEngine, QueryError, Row,
    Value,
};
use tracing::warn;

use crate::config::{build_schema, DatasetConfig, ProjectConfig};
use crate::storage::read_rows;

/// A dataset's configuration entry with its CSV path resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSource {
    pub config: DatasetConfig,
    pub path: PathBuf,
}

/// Configuration, schemas, and dataset sources of one generation.
///
/// Built completely before it is published and never modified afterwards.
/// A request that holds a snapshot reads schemas and CSV paths from the same
/// generation for its whole lifetime.
#[derive(Debug)]
pub struct CatalogSnapshot {
    generation: u64,
    config: ProjectConfig,
    catalog: DatasetCatalog,
    sources: HashMap<String, DatasetSource>,
}

impl CatalogSnapshot {
    /// Validates every dataset of `config` and builds a snapshot from it.
    ///
    /// Relative CSV paths resolve against `base_dir`. A CSV file that does
    /// not exist yet only logs a warning, since rows are read per query.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; nothing is built in that case.
    pub fn build(
        generation: u64,
        config: ProjectConfig,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let mut schemas = Vec::with_capacity(config.datasets.len());
        let mut sources = HashMap::with_capacity(config.datasets.len());

        for dataset in &config.datasets {
            schemas.push(build_schema(dataset)?);

            let path = dataset.resolve_path(base_dir);
            if !path.is_file() {
                warn!(dataset = %dataset.id, path = %path.display(), "dataset file not found");
            }
            sources.insert(
                dataset.id.clone(),
                DatasetSource {
                    config: dataset.clone(),
                    path,
                },
            );
        }

        Ok(Self {
            generation,
            config,
            catalog: DatasetCatalog::new(schemas),
            sources,
        })
    }

    /// 1 for the snapshot built at startup, incremented by each successful reload.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn source(&self, dataset_id: &str) -> Option<&DatasetSource> {
        self.sources.get(dataset_id)
    }

    /// Query engine bound to this snapshot's catalog and storage.
    #[must_use]
    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.catalog, self)
    }

    fn locate(&self, dataset_id: &str) -> Result<(&DatasetSchema, &Path), QueryError> {
        let schema = self.catalog.get_schema(dataset_id)?;
        let source = self
            .sources
            .get(dataset_id)
            .ok_or_else(|| QueryError::dataset_not_found(dataset_id))?;
        Ok((schema, &source.path))
    }
}

#[async_trait]
impl DatasetStorage for CatalogSnapshot {
    fn list_schemas(&self) -> Vec<DatasetSchema> {
        self.catalog.list_schemas().to_vec()
    }

    async fn load_dataset(&self, dataset_id: &str) -> Result<Vec<Row>, QueryError> {
        let (schema, path) = self.locate(dataset_id)?;
        read_rows(schema, path).await
    }

    async fn load_by_id(&self, dataset_id: &str, key: &Value) -> Result<Option<Row>, QueryError> {
        let (schema, path) = self.locate(dataset_id)?;
        let rows = read_rows(schema, path).await?;
        Ok(rows.into_iter().find(|row| {
            row.get(&schema.key_field)
                .is_some_and(|cell| cell.matches_key(key))
        }))
    }
}
