//! Tool names, discovery metadata, argument shapes, and result shapes.

use catalog_core::{DatasetSchema, LimitPolicy, Row};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

/// Tool names exposed by the service.
pub mod tool_names {
    pub const LIST_DATASETS: &str = "list_datasets";
    pub const DESCRIBE_DATASET: &str = "describe_dataset";
    pub const QUERY_DATASET: &str = "query_dataset";
    pub const GET_BY_ID: &str = "get_by_id";
}

/// Discovery metadata for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema of the tool's arguments.
    pub input_schema: Json,
}

/// Metadata for every tool, in a stable order.
#[must_use]
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let select_fields = json!({
        "type": "array",
        "items": {"type": "string"},
        "description": "Optional array of field names to include in results"
    });

    vec![
        ToolDescriptor {
            name: tool_names::LIST_DATASETS,
            description: "List all available datasets with their schemas",
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        },
        ToolDescriptor {
            name: tool_names::DESCRIBE_DATASET,
            description: "Get detailed schema information for a specific dataset",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "datasetId": {"type": "string", "description": "The ID of the dataset to describe"}
                },
                "required": ["datasetId"]
            }),
        },
        ToolDescriptor {
            name: tool_names::QUERY_DATASET,
            description: "Query a dataset with optional filtering, field selection, and limits",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "datasetId": {"type": "string", "description": "The ID of the dataset to query"},
                    "filter": {
                        "type": "object",
                        "description": "Optional filter expression (supports eq, contains, and operators)",
                        "properties": {
                            "field": {"type": "string"},
                            "op": {"type": "string", "enum": ["eq", "contains"]},
                            "value": {"oneOf": [{"type": "string"}, {"type": "number"}, {"type": "boolean"}]},
                            "and": {"type": "array"}
                        }
                    },
                    "selectFields": select_fields.clone(),
                    "limit": {"type": "number", "description": "Maximum number of rows to return", "minimum": 1}
                },
                "required": ["datasetId"]
            }),
        },
        ToolDescriptor {
            name: tool_names::GET_BY_ID,
            description: "Retrieve a single row by its key field value",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "datasetId": {"type": "string", "description": "The ID of the dataset to query"},
                    "id": {
                        "oneOf": [{"type": "string"}, {"type": "number"}],
                        "description": "The value of the key field to search for"
                    },
                    "selectFields": select_fields
                },
                "required": ["datasetId", "id"]
            }),
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeDatasetArgs {
    pub dataset_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDatasetArgs {
    pub dataset_id: String,
    /// Raw filter tree; parsed strictly before it reaches the engine.
    #[serde(default)]
    pub filter: Option<Json>,
    #[serde(default)]
    pub select_fields: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetByIdArgs {
    pub dataset_id: String,
    /// Key value: a string or a number.
    #[serde(default)]
    pub id: Json,
    #[serde(default)]
    pub select_fields: Option<Vec<String>>,
}

/// One entry of the `list_datasets` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub field_count: usize,
    pub key_field: String,
    pub lookup_keys: Vec<String>,
    pub visible_fields: Vec<String>,
    pub limits: LimitPolicy,
}

impl From<&DatasetSchema> for DatasetSummary {
    fn from(schema: &DatasetSchema) -> Self {
        Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            description: schema.description.clone(),
            field_count: schema.fields.len(),
            key_field: schema.key_field.clone(),
            lookup_keys: schema.lookup_keys.clone(),
            visible_fields: schema.visible_fields.clone(),
            limits: schema.limits,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDatasetsOutput {
    pub datasets: Vec<DatasetSummary>,
}

/// Result of `get_by_id`: zero or one row.
#[derive(Debug, Clone, Serialize)]
pub struct GetByIdOutput {
    pub rows: Vec<Row>,
    pub count: usize,
    pub fields: Vec<String>,
}
