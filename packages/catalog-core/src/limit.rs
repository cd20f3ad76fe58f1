//! Row-limit resolution and truncation detection.
//!
//! Kept as two separate functions so a query can report both the cap it
//! applied and whether any matching rows were dropped by it.

use crate::schema::DatasetSchema;

/// Computes the row cap for a query.
///
/// An absent or non-positive request falls back to the schema's default
/// limit; a positive request is clamped to the schema's maximum.
#[must_use]
pub fn effective_limit(schema: &DatasetSchema, requested: Option<i64>) -> usize {
    let limits = schema.limits;
    match requested.and_then(|r| usize::try_from(r).ok()) {
        Some(r) if r > 0 => r.min(limits.max_limit),
        _ => limits.default_limit,
    }
}

/// Whether more rows matched than the limit let through.
#[must_use]
pub fn was_truncated(total_matched: usize, effective_limit: usize) -> bool {
    total_matched > effective_limit
}
