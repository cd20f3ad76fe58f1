//! Filter expression tree and its evaluator.
//!
//! A filter is either a leaf test on one field ([`FieldFilter`]) or an
//! AND-conjunction of nested filters ([`FilterExpr::And`]). Evaluation is a
//! structural recursion over the tree; filtering keeps the input order.

use std::fmt;

use crate::error::QueryError;
use crate::types::{Row, Value};

/// Comparison applied by a [`FieldFilter`].
///
/// `Other` holds an operator name that no evaluator understands. Strict
/// parsers never produce it, but trees assembled elsewhere may; evaluating
/// one fails with [`QueryError::UnsupportedOperator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    /// Strict type-and-value equality.
    Eq,
    /// Case-sensitive substring match on the text forms.
    Contains,
    Other(String),
}

impl FilterOp {
    /// Operator names accepted from callers.
    pub const SUPPORTED: [&'static str; 2] = ["eq", "contains"];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Contains => "contains",
            FilterOp::Other(op) => op,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, FilterOp::Other(_))
    }
}

impl From<&str> for FilterOp {
    fn from(op: &str) -> Self {
        match op {
            "eq" => FilterOp::Eq,
            "contains" => FilterOp::Contains,
            other => FilterOp::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf condition: `row[field] <op> value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    /// Never [`Value::Null`] when produced by a strict parser.
    pub value: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Filter expression tree. Built fresh per request; never cyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Field(FieldFilter),
    /// Matches when every child matches. An empty list matches every row.
    And(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Shorthand for an `eq` leaf.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Field(FieldFilter::new(field, FilterOp::Eq, value))
    }

    /// Shorthand for a `contains` leaf.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Field(FieldFilter::new(field, FilterOp::Contains, value))
    }

    /// Every field name referenced anywhere in the tree, first occurrence
    /// first, duplicates removed.
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::Field(leaf) => {
                if !out.contains(&leaf.field.as_str()) {
                    out.push(&leaf.field);
                }
            }
            FilterExpr::And(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }

    /// Evaluates the expression against one row.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedOperator`] if a reached leaf carries
    /// [`FilterOp::Other`]. Children of an `and` are evaluated left to right
    /// and stop at the first non-match, so a bad leaf after a failing sibling
    /// is not reached.
    pub fn matches(&self, row: &Row) -> Result<bool, QueryError> {
        match self {
            FilterExpr::And(children) => {
                for child in children {
                    if !child.matches(row)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            FilterExpr::Field(leaf) => {
                let cell = row.get(&leaf.field);
                match &leaf.op {
                    FilterOp::Eq => Ok(cell == Some(&leaf.value)),
                    FilterOp::Contains => {
                        let haystack = cell.map(Value::to_text).unwrap_or_default();
                        Ok(haystack.contains(&leaf.value.to_text()))
                    }
                    FilterOp::Other(op) => Err(QueryError::UnsupportedOperator { op: op.clone() }),
                }
            }
        }
    }
}

/// Keeps the rows matching `filter`, preserving their order.
///
/// `None` returns the rows unchanged.
///
/// # Errors
///
/// Propagates [`QueryError::UnsupportedOperator`] from [`FilterExpr::matches`].
pub fn apply_filter(rows: Vec<Row>, filter: Option<&FilterExpr>) -> Result<Vec<Row>, QueryError> {
    let Some(filter) = filter else {
        return Ok(rows);
    };

    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if filter.matches(&row)? {
            kept.push(row);
        }
    }
    Ok(kept)
}
