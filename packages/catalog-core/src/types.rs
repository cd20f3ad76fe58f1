use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Scalar cell value carried by a [`Row`].
///
/// Closed over the four shapes a tabular cell can take. Equality is strict:
/// `String("1")` never equals `Number(1.0)`, and no variant coerces into
/// another when compared.
///
/// Integral numbers serialize as JSON integers so that `1.0` reads back as `1`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing or unparseable source data.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Numeric cell (64-bit IEEE 754).
    Number(f64),
    /// Text cell (UTF-8).
    String(String),
}

/// Largest magnitude an `f64` can hold while still representing every integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form used by substring matching and key lookup.
    ///
    /// Null renders as the empty string, integral numbers without a fractional
    /// part (`1`, not `1.0`), booleans as `true`/`false`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
        }
    }

    /// Key lookup comparison: equal text forms, so a key requested as `"1"`
    /// finds a numeric cell `1`. A null cell never matches.
    #[must_use]
    pub fn matches_key(&self, key: &Value) -> bool {
        !self.is_null() && self.to_text() == key.to_text()
    }

    /// Converts a JSON scalar into a `Value`.
    ///
    /// Returns `None` for arrays, objects, and numbers outside `f64` range.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        Some(n as i64)
    } else {
        None
    }
}

fn format_number(n: f64) -> String {
    match integral(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            other => f.write_str(&other.to_text()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// One record of a dataset: field name to [`Value`], in insertion order.
///
/// Order is preserved so projected rows serialize their fields in the order
/// the caller asked for. A field that is not present is *unset*, which is
/// distinct from a field explicitly holding [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty row with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Looks up a field. `None` means the field is unset.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Sets a field, replacing an existing value in place or appending a new one.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Whether the field is set (possibly to null).
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Number of set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_does_not_coerce() {
        assert_ne!(Value::from("1"), Value::from(1));
        assert_ne!(Value::from(true), Value::from(1));
        assert_ne!(Value::Null, Value::from(""));
        assert_eq!(Value::from(1), Value::Number(1.0));
    }

    #[test]
    fn text_form_matches_display_rules() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::from(42).to_text(), "42");
        assert_eq!(Value::from(1.5).to_text(), "1.5");
        assert_eq!(Value::from(false).to_text(), "false");
        assert_eq!(Value::from("abc").to_text(), "abc");
    }

    #[test]
    fn integral_numbers_serialize_as_integers() {
        let json = serde_json::to_string(&Value::from(7)).unwrap();
        assert_eq!(json, "7");
        let json = serde_json::to_string(&Value::from(2.5)).unwrap();
        assert_eq!(json, "2.5");
        let json = serde_json::to_string(&Value::Null).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn key_matching_uses_text_forms() {
        assert!(Value::from(1).matches_key(&Value::from("1")));
        assert!(Value::from("user1").matches_key(&Value::from("user1")));
        assert!(!Value::from(1).matches_key(&Value::from(2)));
        assert!(!Value::Null.matches_key(&Value::from("")));
    }

    #[test]
    fn from_json_accepts_scalars_only() {
        assert_eq!(
            Value::from_json(&serde_json::json!("x")),
            Some(Value::from("x"))
        );
        assert_eq!(Value::from_json(&serde_json::json!(3)), Some(Value::from(3)));
        assert_eq!(Value::from_json(&serde_json::json!(null)), Some(Value::Null));
        assert_eq!(Value::from_json(&serde_json::json!([1])), None);
        assert_eq!(Value::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn row_insert_replaces_in_place() {
        let mut row: Row = [("a", Value::from(1)), ("b", Value::from(2))]
            .into_iter()
            .collect();
        row.insert("a", Value::from(10));
        assert_eq!(row.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::from(10)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn row_distinguishes_unset_from_null() {
        let row: Row = [("a", Value::Null)].into_iter().collect();
        assert!(row.contains("a"));
        assert_eq!(row.get("a"), Some(&Value::Null));
        assert!(!row.contains("b"));
        assert_eq!(row.get("b"), None);
    }

    #[test]
    fn row_serializes_in_insertion_order() {
        let row: Row = [
            ("name", Value::from("Alice")),
            ("id", Value::from(1)),
            ("active", Value::from(true)),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"Alice","id":1,"active":true}"#);
    }
}
