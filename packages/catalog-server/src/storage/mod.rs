//! Row storage backed by CSV files.
//!
//! Rows are read from disk on every call, so edits to a dataset's CSV file
//! are visible to the next query without a configuration reload.

pub mod csv;

pub use self::csv::{coerce_cell, parse_rows, read_rows};
