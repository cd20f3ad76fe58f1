//! Structural and cross-reference checks over a parsed configuration.
//!
//! Every check here runs identically at startup and at reload; the caller
//! decides whether a failure is fatal.

use std::collections::HashSet;

use catalog_core::schema::{is_valid_dataset_id, is_valid_field_name};
use catalog_core::{ConfigError, DatasetSchema, FieldType, LimitPolicy};

use super::model::{DatasetConfig, LimitsConfig, ProjectConfig};

/// Checks the rules that span the whole configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for an empty dataset list or a repeated
/// dataset id.
pub fn validate_project(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.datasets.is_empty() {
        return Err(ConfigError::Invalid(
            "At least one dataset is required.".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for dataset in &config.datasets {
        if !seen.insert(dataset.id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Dataset IDs must be unique across all datasets (duplicate '{}').",
                dataset.id
            )));
        }
    }
    Ok(())
}

/// Validates one dataset entry and builds its schema.
///
/// # Errors
///
/// Returns [`ConfigError::Dataset`] naming the dataset and the first rule it
/// violates.
pub fn build_schema(config: &DatasetConfig) -> Result<DatasetSchema, ConfigError> {
    let fail = |message: String| ConfigError::dataset(&config.id, message);

    if !is_valid_dataset_id(&config.id) {
        return Err(fail(
            "Dataset ID must contain only alphanumeric characters, hyphens, and underscores."
                .to_string(),
        ));
    }
    if config.name.is_empty() {
        return Err(fail("Dataset name cannot be empty.".to_string()));
    }
    if config.path.is_empty() {
        return Err(fail("Path cannot be empty.".to_string()));
    }

    check_fields(config).map_err(fail)?;
    check_references(config).map_err(fail)?;
    let limits = check_limits(config.limits).map_err(fail)?;

    Ok(DatasetSchema {
        id: config.id.clone(),
        name: config.name.clone(),
        description: config.description.clone(),
        fields: config.fields.clone(),
        key_field: config.key_field.clone(),
        lookup_keys: config.lookup_keys.clone(),
        visible_fields: config.visible_fields.clone(),
        limits,
    })
}

fn check_fields(config: &DatasetConfig) -> Result<(), String> {
    if config.fields.is_empty() {
        return Err("At least one field is required.".to_string());
    }

    let mut seen = HashSet::new();
    for field in &config.fields {
        if !is_valid_field_name(&field.name) {
            return Err(format!(
                "Field name '{}' must be a valid identifier.",
                field.name
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(
                "Duplicate field names detected. Each field name must be unique.".to_string(),
            );
        }
        match &field.enum_values {
            Some(values) if values.is_empty() || values.iter().any(String::is_empty) => {
                return Err(format!(
                    "Field '{}': enumValues must be a non-empty list of non-empty strings.",
                    field.name
                ));
            }
            None if field.field_type == FieldType::Enum => {
                return Err(format!(
                    "Field '{}': enum fields must have non-empty 'enumValues' array.",
                    field.name
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_references(config: &DatasetConfig) -> Result<(), String> {
    let exists = |name: &str| config.fields.iter().any(|f| f.name == name);

    if !exists(&config.key_field) {
        return Err(format!(
            "keyField '{}' does not exist in fields array.",
            config.key_field
        ));
    }
    if let Some(key) = config.lookup_keys.iter().find(|k| !exists(k)) {
        return Err(format!("lookupKey '{key}' does not exist in fields array."));
    }
    if config.visible_fields.is_empty() {
        return Err(
            "visibleFields cannot be empty. At least one field must be visible.".to_string(),
        );
    }
    if let Some(field) = config.visible_fields.iter().find(|f| !exists(f)) {
        return Err(format!(
            "visibleField '{field}' does not exist in fields array."
        ));
    }
    Ok(())
}

fn check_limits(limits: LimitsConfig) -> Result<LimitPolicy, String> {
    let LimitsConfig {
        default_limit,
        max_limit,
    } = limits;

    let default = usize::try_from(default_limit)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| format!("defaultLimit must be positive (got {default_limit})."))?;
    let max = usize::try_from(max_limit)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| format!("maxLimit must be positive (got {max_limit})."))?;
    if max < default {
        return Err(format!(
            "maxLimit ({max_limit}) must be >= defaultLimit ({default_limit})."
        ));
    }

    Ok(LimitPolicy {
        default_limit: default,
        max_limit: max,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use catalog_core::FieldDefinition;

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

    pub(crate) fn users_config() -> DatasetConfig {
        DatasetConfig {
            id: "users".to_string(),
            name: "Users".to_string(),
            description: Some("Registered users".to_string()),
            path: "users.csv".to_string(),
            fields: vec![
                FieldDefinition {
                    is_key: true,
                    is_lookup_key: true,
                    ..field("id", FieldType::Number)
                },
                field("name", FieldType::String),
                field("active", FieldType::Boolean),
            ],
            key_field: "id".to_string(),
            lookup_keys: vec!["id".to_string()],
            visible_fields: vec!["id".to_string(), "name".to_string()],
            limits: LimitsConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    fn dataset_message(err: ConfigError) -> String {
        match err {
            ConfigError::Dataset {
                dataset_id,
                message,
            } => {
                assert_eq!(dataset_id, "users");
                message
            }
            other => panic!("expected a dataset error, got {other:?}"),
        }
    }

    #[test]
    fn valid_config_builds_schema() {
        let schema = build_schema(&users_config()).unwrap();
        assert_eq!(schema.id, "users");
        assert_eq!(schema.description.as_deref(), Some("Registered users"));
        assert_eq!(
            schema.limits,
            LimitPolicy {
                default_limit: 10,
                max_limit: 100
            }
        );
        assert_eq!(schema.field_names(), vec!["id", "name", "active"]);
    }

    #[test]
    fn missing_key_field_is_rejected() {
        let mut config = users_config();
        config.key_field = "uid".to_string();
        let err = build_schema(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dataset 'users': keyField 'uid' does not exist in fields array."
        );
    }

    #[test]
    fn missing_lookup_key_is_rejected() {
        let mut config = users_config();
        config.lookup_keys.push("email".to_string());
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("lookupKey 'email'"));
    }

    #[test]
    fn visible_fields_must_exist_and_be_non_empty() {
        let mut config = users_config();
        config.visible_fields = vec!["ghost".to_string()];
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("visibleField 'ghost'"));

        config.visible_fields.clear();
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("cannot be empty"));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let mut config = users_config();
        config.fields.push(field("name", FieldType::String));
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("Duplicate field names"));
    }

    #[test]
    fn limits_must_be_positive_and_ordered() {
        let mut config = users_config();
        config.limits.default_limit = 0;
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("defaultLimit must be positive"));

        config.limits = LimitsConfig {
            default_limit: 10,
            max_limit: -1,
        };
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("maxLimit must be positive"));

        config.limits = LimitsConfig {
            default_limit: 50,
            max_limit: 20,
        };
        assert_eq!(
            dataset_message(build_schema(&config).unwrap_err()),
            "maxLimit (20) must be >= defaultLimit (50)."
        );
    }

    #[test]
    fn equal_limits_are_allowed() {
        let mut config = users_config();
        config.limits = LimitsConfig {
            default_limit: 5,
            max_limit: 5,
        };
        assert!(build_schema(&config).is_ok());
    }

    #[test]
    fn enum_fields_need_values() {
        let mut config = users_config();
        config.fields.push(field("role", FieldType::Enum));
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("enumValues"));

        config.fields[3].enum_values = Some(Vec::new());
        assert!(build_schema(&config).is_err());

        config.fields[3].enum_values = Some(vec!["admin".to_string(), "user".to_string()]);
        assert!(build_schema(&config).is_ok());
    }

    #[test]
    fn identifier_patterns_are_enforced() {
        let mut config = users_config();
        config.fields[1].name = "first name".to_string();
        config.visible_fields = vec!["id".to_string()];
        assert!(dataset_message(build_schema(&config).unwrap_err()).contains("valid identifier"));

        let mut config = users_config();
        config.id = "users!".to_string();
        assert!(matches!(
            build_schema(&config).unwrap_err(),
            ConfigError::Dataset { .. }
        ));
    }

    #[test]
    fn project_rules() {
        let empty = ProjectConfig {
            datasets: Vec::new(),
        };
        assert!(matches!(
            validate_project(&empty).unwrap_err(),
            ConfigError::Invalid(_)
        ));

        let duplicated = ProjectConfig {
            datasets: vec![users_config(), users_config()],
        };
        let err = validate_project(&duplicated).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Dataset IDs must be unique"));

        let single = ProjectConfig {
            datasets: vec![users_config()],
        };
        assert!(validate_project(&single).is_ok());
    }
}
