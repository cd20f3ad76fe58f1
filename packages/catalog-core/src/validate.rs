//! Field-reference checks against a dataset schema.

use crate::error::QueryError;
use crate::filter::FilterExpr;
use crate::schema::DatasetSchema;

/// Checks that every field referenced by `filter` exists in `schema`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidField`] naming the first unknown field (in
/// tree order) along with every valid field name.
pub fn validate_filter_fields(filter: &FilterExpr, schema: &DatasetSchema) -> Result<(), QueryError> {
    check_fields(filter.referenced_fields(), schema)
}

/// Checks that every selected field exists in `schema`.
///
/// An empty selection is valid; the orchestrator substitutes the schema's
/// visible fields before projecting.
///
/// # Errors
///
/// Returns [`QueryError::InvalidField`] naming the first unknown field along
/// with every valid field name.
pub fn validate_select_fields<S: AsRef<str>>(
    fields: &[S],
    schema: &DatasetSchema,
) -> Result<(), QueryError> {
    check_fields(fields.iter().map(AsRef::as_ref), schema)
}

fn check_fields<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    schema: &DatasetSchema,
) -> Result<(), QueryError> {
    for field in fields {
        if !schema.has_field(field) {
            return Err(QueryError::InvalidField {
                field: field.to_string(),
                valid_fields: schema.field_names(),
            });
        }
    }
    Ok(())
}
