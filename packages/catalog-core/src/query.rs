//! Query and lookup orchestration over a catalog and a storage backend.

use serde::Serialize;
use tracing::debug;

use crate::catalog::DatasetCatalog;
use crate::error::QueryError;
use crate::filter::{apply_filter, FilterExpr};
use crate::limit::{effective_limit, was_truncated};
use crate::projection::project;
use crate::schema::DatasetSchema;
use crate::traits::DatasetStorage;
use crate::types::{Row, Value};
use crate::validate::{validate_filter_fields, validate_select_fields};

/// A full query against one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub dataset_id: String,
    pub filter: Option<FilterExpr>,
    pub select_fields: Option<Vec<String>>,
    /// Requested row cap; absent or non-positive means the dataset default.
    pub limit: Option<i64>,
}

impl QueryRequest {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_select_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Rows returned by a query or lookup, plus how they were produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub rows: Vec<Row>,
    /// Rows actually returned.
    pub count: usize,
    /// Rows that matched the filter before the limit was applied.
    pub total_matched: usize,
    pub truncated: bool,
    pub limit_applied: bool,
    /// Fields each returned row was projected to.
    pub fields: Vec<String>,
}

/// Answers queries using one catalog generation and one storage backend.
///
/// Borrowing both for the lifetime of a request keeps every step of that
/// request on the same schema set, even if a newer one is published meanwhile.
pub struct QueryEngine<'a> {
    catalog: &'a DatasetCatalog,
    storage: &'a dyn DatasetStorage,
}

impl<'a> QueryEngine<'a> {
    pub fn new(catalog: &'a DatasetCatalog, storage: &'a dyn DatasetStorage) -> Self {
        Self { catalog, storage }
    }

    #[must_use]
    pub fn list_schemas(&self) -> &'a [DatasetSchema] {
        self.catalog.list_schemas()
    }

    /// Returns the schema for one dataset.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DatasetNotFound`] for an unknown id.
    pub fn describe(&self, dataset_id: &str) -> Result<&'a DatasetSchema, QueryError> {
        self.catalog.get_schema(dataset_id)
    }

    /// Runs a full query: validate, fetch, filter, limit, project.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DatasetNotFound`] or [`QueryError::InvalidField`]
    /// before any rows are fetched, [`QueryError::UnsupportedOperator`] from a
    /// malformed filter tree, and storage failures unchanged.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        let schema = self.catalog.get_schema(&request.dataset_id)?;

        if let Some(filter) = &request.filter {
            validate_filter_fields(filter, schema)?;
        }

        let fields = fields_to_return(schema, request.select_fields.as_deref());
        validate_select_fields(&fields, schema)?;

        let rows = self.storage.load_dataset(&schema.id).await?;
        let mut matched = apply_filter(rows, request.filter.as_ref())?;

        let total_matched = matched.len();
        let limit = effective_limit(schema, request.limit);
        matched.truncate(limit);

        let rows = project(matched, &fields);
        debug!(
            dataset_id = %schema.id,
            total_matched,
            returned = rows.len(),
            limit,
            "query evaluated"
        );

        Ok(QueryResult {
            count: rows.len(),
            total_matched,
            truncated: was_truncated(total_matched, limit),
            limit_applied: true,
            fields,
            rows,
        })
    }

    /// Fetches the single row whose key field matches `key`.
    ///
    /// A miss is an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DatasetNotFound`], [`QueryError::InvalidField`]
    /// for a bad selection, and storage failures unchanged.
    pub async fn get_by_id(
        &self,
        dataset_id: &str,
        key: &Value,
        select_fields: Option<&[String]>,
    ) -> Result<QueryResult, QueryError> {
        let schema = self.catalog.get_schema(dataset_id)?;

        let fields = fields_to_return(schema, select_fields);
        validate_select_fields(&fields, schema)?;

        let rows: Vec<Row> = self
            .storage
            .load_by_id(&schema.id, key)
            .await?
            .into_iter()
            .collect();
        let rows = project(rows, &fields);
        debug!(dataset_id = %schema.id, %key, found = !rows.is_empty(), "lookup evaluated");

        Ok(QueryResult {
            count: rows.len(),
            total_matched: rows.len(),
            truncated: false,
            limit_applied: false,
            fields,
            rows,
        })
    }
}

fn fields_to_return(schema: &DatasetSchema, selection: Option<&[String]>) -> Vec<String> {
    match selection {
        Some(fields) if !fields.is_empty() => fields.to_vec(),
        _ => schema.visible_fields.clone(),
    }
}
