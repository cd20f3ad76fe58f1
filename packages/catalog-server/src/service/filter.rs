//! Strict parsing of JSON filter arguments into [`FilterExpr`] trees.
//!
//! Accepted shapes:
//! - `{"field": "name", "op": "eq" | "contains", "value": string | number | boolean}`
//! - `{"and": [<filter>, ...]}` with at least one element

use catalog_core::{FieldFilter, FilterExpr, FilterOp, Value};
use serde_json::{Map, Value as Json};

/// Why a filter argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FilterParseError {
    message: String,
}

impl FilterParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Parses a filter argument.
///
/// # Errors
///
/// Returns [`FilterParseError`] describing the first malformed node. Errors
/// inside an `and` list are prefixed with the offending element's index.
pub fn parse_filter(json: &Json) -> Result<FilterExpr, FilterParseError> {
    let Json::Object(object) = json else {
        return Err(FilterParseError::new("Filter must be an object"));
    };

    if let Some(children) = object.get("and") {
        parse_compound(children)
    } else {
        parse_field(object)
    }
}

fn parse_compound(children: &Json) -> Result<FilterExpr, FilterParseError> {
    let Json::Array(children) = children else {
        return Err(FilterParseError::new(
            "Compound filter must have an \"and\" array",
        ));
    };
    if children.is_empty() {
        return Err(FilterParseError::new(
            "Compound filter must have at least one sub-filter",
        ));
    }

    children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            parse_filter(child).map_err(|e| {
                FilterParseError::new(format!("Invalid sub-filter at index {index}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(FilterExpr::And)
}

fn parse_field(object: &Map<String, Json>) -> Result<FilterExpr, FilterParseError> {
    let field = match object.get("field") {
        Some(Json::String(field)) if !field.is_empty() => field,
        _ => {
            return Err(FilterParseError::new(
                "Field filter must have a \"field\" string",
            ))
        }
    };
    let op = match object.get("op") {
        Some(Json::String(op)) if !op.is_empty() => FilterOp::from(op.as_str()),
        _ => {
            return Err(FilterParseError::new(
                "Field filter must have an \"op\" string",
            ))
        }
    };
    let Some(value) = object.get("value") else {
        return Err(FilterParseError::new(
            "Field filter must have a \"value\" property",
        ));
    };

    if !op.is_supported() {
        return Err(FilterParseError::new(format!(
            "Operator \"{op}\" is not supported. Supported operators: eq, contains"
        )));
    }

    let value = match value {
        Json::String(_) | Json::Number(_) | Json::Bool(_) => Value::from_json(value),
        _ => None,
    }
    .ok_or_else(|| {
        FilterParseError::new(format!(
            "Filter value must be string, number, or boolean (got {})",
            json_type(value)
        ))
    })?;

    Ok(FilterExpr::Field(FieldFilter::new(field.clone(), op, value)))
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
