use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DATASET_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap_or_else(|e| unreachable!("invalid pattern: {e}"))
});

static FIELD_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap_or_else(|e| unreachable!("invalid pattern: {e}"))
});

/// Whether `id` is a well-formed dataset identifier (alphanumerics, `-`, `_`).
#[must_use]
pub fn is_valid_dataset_id(id: &str) -> bool {
    DATASET_ID_PATTERN.is_match(id)
}

/// Whether `name` is a well-formed field name (identifier syntax).
#[must_use]
pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME_PATTERN.is_match(name)
}

/// Declared type of a dataset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// Text restricted to the field's `enum_values`.
    Enum,
}

impl FieldType {
    /// All supported types, in declaration order.
    pub const ALL: [FieldType; 4] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Enum,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single field definition within a dataset schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name, unique within its schema.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Permitted values; present and non-empty iff `field_type` is `Enum`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<String>>,
    /// Whether this field is the dataset's primary key.
    pub is_key: bool,
    /// Whether this field may be used for lookups.
    pub is_lookup_key: bool,
}

/// Row-count bounds for queries against one dataset.
///
/// Invariant (enforced at configuration load): `0 < default_limit <= max_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitPolicy {
    /// Rows returned when the caller does not ask for a positive limit.
    pub default_limit: usize,
    /// Upper bound on any requested limit.
    pub max_limit: usize,
}

/// Validated description of one dataset.
///
/// Built only by configuration loading; `key_field`, every lookup key, and
/// every visible field name an existing [`FieldDefinition`]. Immutable once
/// built: a configuration reload replaces schemas wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSchema {
    /// Unique dataset identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDefinition>,
    /// Primary key field.
    pub key_field: String,
    /// Fields usable for lookups.
    pub lookup_keys: Vec<String>,
    /// Fields returned when a query does not select any.
    pub visible_fields: Vec<String>,
    pub limits: LimitPolicy,
}

impl DatasetSchema {
    /// Field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Whether the schema declares a field called `name`.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Looks up a field definition by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}
