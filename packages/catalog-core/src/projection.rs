//! Field projection.

use crate::types::Row;

/// Reduces each row to `fields`, in the order requested.
///
/// An empty field list passes the rows through unchanged. Repeated names in
/// `fields` yield a single entry at the first position. A requested field
/// that is unset in the source row stays unset; an explicit null is kept.
#[must_use]
pub fn project<S: AsRef<str>>(rows: Vec<Row>, fields: &[S]) -> Vec<Row> {
    if fields.is_empty() {
        return rows;
    }

    rows.iter().map(|row| project_row(row, fields)).collect()
}

fn project_row<S: AsRef<str>>(row: &Row, fields: &[S]) -> Row {
    let mut projected = Row::with_capacity(fields.len());
    for field in fields {
        let field = field.as_ref();
        if projected.contains(field) {
            continue;
        }
        if let Some(value) = row.get(field) {
            projected.insert(field, value.clone());
        }
    }
    projected
}
