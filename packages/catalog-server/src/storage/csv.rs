use std::path::Path;

use anyhow::Context;
use catalog_core::{DatasetSchema, FieldDefinition, FieldType, QueryError, Row, Value};

/// Reads every row of a dataset's CSV file, typed by its schema.
///
/// # Errors
///
/// Returns [`QueryError::Storage`] if the file cannot be read or is not
/// valid CSV.
pub async fn read_rows(schema: &DatasetSchema, path: &Path) -> Result<Vec<Row>, QueryError> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read dataset '{}' from '{}'", schema.id, path.display()))?;
    let rows = parse_rows(schema, &bytes)
        .with_context(|| format!("failed to parse dataset '{}' from '{}'", schema.id, path.display()))?;
    Ok(rows)
}

/// Parses CSV bytes into rows. The first record is the header.
///
/// Each row holds one entry per schema field, in schema order. Header columns
/// the schema does not declare are ignored; a declared field with no column
/// is null.
///
/// # Errors
///
/// Returns an error for malformed CSV (e.g. invalid UTF-8).
pub fn parse_rows(schema: &DatasetSchema, bytes: &[u8]) -> anyhow::Result<Vec<Row>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<usize>> = schema
        .fields
        .iter()
        .map(|field| headers.iter().position(|h| h == field.name))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = schema
            .fields
            .iter()
            .zip(&columns)
            .map(|(field, column)| {
                let cell = column.and_then(|i| record.get(i));
                (field.name.as_str(), coerce_cell(field, cell))
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Converts one trimmed cell to a [`Value`] of the field's declared type.
///
/// Anything that does not fit the type becomes null.
#[must_use]
pub fn coerce_cell(field: &FieldDefinition, cell: Option<&str>) -> Value {
    let Some(text) = cell else {
        return Value::Null;
    };

    match field.field_type {
        FieldType::String => Value::String(text.to_string()),
        FieldType::Number => text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or(Value::Null, Value::Number),
        FieldType::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::Null
            }
        }
        FieldType::Enum => {
            let permitted = field
                .enum_values
                .as_ref()
                .is_some_and(|values| values.iter().any(|v| v == text));
            if permitted {
                Value::String(text.to_string())
            } else {
                Value::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::LimitPolicy;

    use super::*;

    fn field(name: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            field_type,
            enum_values: None,
            is_key: false,
            is_lookup_key: false,
        }
    }

    fn schema() -> DatasetSchema {
        let mut role = field("role", FieldType::Enum);
        role.enum_values = Some(vec!["admin".to_string(), "user".to_string()]);
        DatasetSchema {
            id: "users".to_string(),
            name: "Users".to_string(),
            description: None,
            fields: vec![
                field("id", FieldType::Number),
                field("name", FieldType::String),
                field("active", FieldType::Boolean),
                role,
            ],
            key_field: "id".to_string(),
            lookup_keys: Vec::new(),
            visible_fields: vec!["id".to_string()],
            limits: LimitPolicy {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    #[test]
    fn rows_are_typed_by_schema() {
        let csv = b"id,name,active,role\n1,Alice,true,admin\n2,Bob,FALSE,user\n";
        let rows = parse_rows(&schema(), csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&Value::from(1)));
        assert_eq!(rows[0].get("name"), Some(&Value::from("Alice")));
        assert_eq!(rows[0].get("active"), Some(&Value::from(true)));
        assert_eq!(rows[1].get("active"), Some(&Value::from(false)));
        assert_eq!(rows[1].get("role"), Some(&Value::from("user")));
    }

    #[test]
    fn row_entries_follow_schema_order() {
        let csv = b"role,active,name,id,extra\nadmin,true,Alice,1,zzz\n";
        let rows = parse_rows(&schema(), csv).unwrap();
        assert_eq!(
            rows[0].field_names().collect::<Vec<_>>(),
            vec!["id", "name", "active", "role"]
        );
        assert!(!rows[0].contains("extra"));
    }

    #[test]
    fn unfit_cells_become_null() {
        let csv = b"id,name,active,role\nabc,,yes,root\n";
        let rows = parse_rows(&schema(), csv).unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::Null));
        assert_eq!(rows[0].get("name"), Some(&Value::from("")));
        assert_eq!(rows[0].get("active"), Some(&Value::Null));
        assert_eq!(rows[0].get("role"), Some(&Value::Null));
    }

    #[test]
    fn missing_column_and_short_records_are_null() {
        let csv = b"id,name\n7\n";
        let rows = parse_rows(&schema(), csv).unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::from(7)));
        assert_eq!(rows[0].get("name"), Some(&Value::Null));
        assert_eq!(rows[0].get("active"), Some(&Value::Null));
    }

    #[test]
    fn cells_are_trimmed() {
        let csv = b"id,name,active,role\n 3 , Cleo ,  True ,admin\n";
        let rows = parse_rows(&schema(), csv).unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::from(3)));
        assert_eq!(rows[0].get("name"), Some(&Value::from("Cleo")));
        assert_eq!(rows[0].get("active"), Some(&Value::from(true)));
    }

    #[test]
    fn non_finite_numbers_are_null() {
        let number = field("n", FieldType::Number);
        assert_eq!(coerce_cell(&number, Some("inf")), Value::Null);
        assert_eq!(coerce_cell(&number, Some("NaN")), Value::Null);
        assert_eq!(coerce_cell(&number, Some("2.5")), Value::from(2.5));
        assert_eq!(coerce_cell(&number, None), Value::Null);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = parse_rows(&schema(), b"id,name,active,role\n").unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn read_rows_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows(&schema(), &dir.path().join("nope.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Storage(_)));
        assert!(err.to_string().contains("failed to read dataset 'users'"));
    }

    #[tokio::test]
    async fn read_rows_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, "id,name,active,role\n1,Alice,true,admin\n").unwrap();
        let rows = read_rows(&schema(), &path).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    proptest::proptest! {
        #[test]
        fn integer_ids_survive_parsing(
            ids in proptest::collection::vec(-1_000_000i64..1_000_000, 0..30),
        ) {
            let mut text = String::from("id,name,active,role\n");
            for id in &ids {
                text.push_str(&format!("{id},n{id},true,user\n"));
            }

            let rows = parse_rows(&schema(), text.as_bytes()).unwrap();
            proptest::prop_assert_eq!(rows.len(), ids.len());
            for (row, id) in rows.iter().zip(&ids) {
                #[allow(clippy::cast_precision_loss)]
                let expected = Value::Number(*id as f64);
                proptest::prop_assert_eq!(row.get("id"), Some(&expected));
            }
        }
    }
}
