//! Catalog core: row model, dataset schemas, filtering, projection, limits,
//! and the query orchestrator that composes them.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod limit;
pub mod memory;
pub mod projection;
pub mod query;
pub mod schema;
pub mod traits;
pub mod types;
pub mod validate;

pub use catalog::DatasetCatalog;
pub use error::{ConfigError, QueryError};
pub use filter::{apply_filter, FieldFilter, FilterExpr, FilterOp};
pub use limit::{effective_limit, was_truncated};
pub use memory::InMemoryStorage;
pub use projection::project;
pub use query::{QueryEngine, QueryRequest, QueryResult};
pub use schema::{DatasetSchema, FieldDefinition, FieldType, LimitPolicy};
pub use traits::DatasetStorage;
pub use types::{Row, Value};
pub use validate::{validate_filter_fields, validate_select_fields};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
