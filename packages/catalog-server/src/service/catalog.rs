//! Tool dispatch over the currently served catalog snapshot.

use std::sync::Arc;
use std::time::Instant;

use catalog_core::{QueryRequest, Value};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tracing::{info, warn};

use super::filter::parse_filter;
use super::operation::OperationError;
use super::tools::{
    tool_descriptors, tool_names, DatasetSummary, DescribeDatasetArgs, GetByIdArgs,
    GetByIdOutput, ListDatasetsOutput, QueryDatasetArgs, ToolDescriptor,
};
use crate::catalog::{CatalogSnapshot, ReloadController};

/// What a successful call produced, kept for the request log line.
struct ToolOutcome {
    body: Json,
    rows: Option<usize>,
    fields: Option<usize>,
}

impl ToolOutcome {
    fn new(body: Json) -> Self {
        Self {
            body,
            rows: None,
            fields: None,
        }
    }
}

/// Answers tool calls against the controller's active snapshot.
///
/// Each call loads the snapshot once and uses it for every step, so a reload
/// that lands mid-call does not affect that call.
#[derive(Debug, Clone)]
pub struct CatalogService {
    controller: Arc<ReloadController>,
}

impl CatalogService {
    #[must_use]
    pub fn new(controller: Arc<ReloadController>) -> Self {
        Self { controller }
    }

    #[must_use]
    pub fn controller(&self) -> &Arc<ReloadController> {
        &self.controller
    }

    #[must_use]
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        tool_descriptors()
    }

    /// Runs the named tool with JSON arguments and returns its JSON result.
    ///
    /// `null` arguments are treated as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`]; see [`OperationError::code`] for how each
    /// failure is classified.
    pub async fn call_tool(&self, name: &str, args: Json) -> Result<Json, OperationError> {
        let started = Instant::now();
        let dataset = args
            .get("datasetId")
            .and_then(Json::as_str)
            .map(str::to_owned);

        let result = self.dispatch(name, args).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(outcome) => {
                info!(
                    tool = name,
                    dataset = dataset.as_deref(),
                    rows = outcome.rows,
                    fields = outcome.fields,
                    duration_ms,
                    "tool call completed"
                );
                Ok(outcome.body)
            }
            Err(error) => {
                warn!(
                    tool = name,
                    dataset = dataset.as_deref(),
                    code = %error.code(),
                    %error,
                    duration_ms,
                    "tool call failed"
                );
                Err(error)
            }
        }
    }

    async fn dispatch(&self, name: &str, args: Json) -> Result<ToolOutcome, OperationError> {
        let snapshot = self.snapshot()?;
        match name {
            tool_names::LIST_DATASETS => list_datasets(&snapshot),
            tool_names::DESCRIBE_DATASET => describe_dataset(&snapshot, parse_args(args)?),
            tool_names::QUERY_DATASET => query_dataset(&snapshot, parse_args(args)?).await,
            tool_names::GET_BY_ID => get_by_id(&snapshot, parse_args(args)?).await,
            other => Err(OperationError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }

    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, OperationError> {
        self.controller
            .snapshot()
            .ok_or_else(|| OperationError::NotReady {
                state: self.controller.state(),
            })
    }
}

fn parse_args<T: DeserializeOwned>(args: Json) -> Result<T, OperationError> {
    let args = if args.is_null() {
        Json::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| OperationError::InvalidArguments(e.to_string()))
}

fn require_dataset_id(dataset_id: &str) -> Result<(), OperationError> {
    if dataset_id.is_empty() {
        return Err(OperationError::InvalidArguments(
            "datasetId parameter is required".to_string(),
        ));
    }
    Ok(())
}

fn list_datasets(snapshot: &CatalogSnapshot) -> Result<ToolOutcome, OperationError> {
    let datasets: Vec<DatasetSummary> = snapshot
        .engine()
        .list_schemas()
        .iter()
        .map(DatasetSummary::from)
        .collect();
    let rows = datasets.len();
    let body = serde_json::to_value(ListDatasetsOutput { datasets })?;
    Ok(ToolOutcome {
        rows: Some(rows),
        ..ToolOutcome::new(body)
    })
}

fn describe_dataset(
    snapshot: &CatalogSnapshot,
    args: DescribeDatasetArgs,
) -> Result<ToolOutcome, OperationError> {
    require_dataset_id(&args.dataset_id)?;
    let schema = snapshot.engine().describe(&args.dataset_id)?;
    let fields = schema.fields.len();
    let body = serde_json::to_value(schema)?;
    Ok(ToolOutcome {
        fields: Some(fields),
        ..ToolOutcome::new(body)
    })
}

async fn query_dataset(
    snapshot: &CatalogSnapshot,
    args: QueryDatasetArgs,
) -> Result<ToolOutcome, OperationError> {
    require_dataset_id(&args.dataset_id)?;
    let filter = args.filter.as_ref().map(parse_filter).transpose()?;

    let request = QueryRequest {
        dataset_id: args.dataset_id,
        filter,
        select_fields: args.select_fields,
        limit: args.limit,
    };
    let result = snapshot.engine().query(&request).await?;
    let (rows, fields) = (result.count, result.fields.len());
    let body = serde_json::to_value(result)?;
    Ok(ToolOutcome {
        rows: Some(rows),
        fields: Some(fields),
        ..ToolOutcome::new(body)
    })
}

async fn get_by_id(
    snapshot: &CatalogSnapshot,
    args: GetByIdArgs,
) -> Result<ToolOutcome, OperationError> {
    require_dataset_id(&args.dataset_id)?;
    let key = match &args.id {
        Json::String(_) | Json::Number(_) => Value::from_json(&args.id),
        _ => None,
    }
    .ok_or_else(|| {
        OperationError::InvalidArguments("id parameter must be a string or number".to_string())
    })?;

    let result = snapshot
        .engine()
        .get_by_id(&args.dataset_id, &key, args.select_fields.as_deref())
        .await?;
    let (rows, fields) = (result.count, result.fields.len());
    let body = serde_json::to_value(GetByIdOutput {
        rows: result.rows,
        count: result.count,
        fields: result.fields,
    })?;
    Ok(ToolOutcome {
        rows: Some(rows),
        fields: Some(fields),
        ..ToolOutcome::new(body)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::controller::tests::fixture;
    use crate::service::ErrorCode;

    fn service() -> (tempfile::TempDir, CatalogService) {
        let (dir, path) = fixture();
        let controller = Arc::new(ReloadController::new(&path));
        controller.initialize().unwrap();
        (dir, CatalogService::new(controller))
    }

    async fn call(service: &CatalogService, name: &str, args: Json) -> Json {
        service.call_tool(name, args).await.unwrap()
    }

    async fn fail(service: &CatalogService, name: &str, args: Json) -> OperationError {
        service.call_tool(name, args).await.unwrap_err()
    }

    #[tokio::test]
    async fn list_datasets_summarizes_schemas() {
        let (_dir, service) = service();
        let body = call(&service, "list_datasets", Json::Null).await;
        assert_eq!(
            body,
            json!({
                "datasets": [{
                    "id": "users",
                    "name": "USERS",
                    "fieldCount": 3,
                    "keyField": "id",
                    "lookupKeys": ["id"],
                    "visibleFields": ["id", "name"],
                    "limits": {"defaultLimit": 10, "maxLimit": 100}
                }]
            })
        );
    }

    #[tokio::test]
    async fn describe_dataset_returns_full_schema() {
        let (_dir, service) = service();
        let body = call(&service, "describe_dataset", json!({"datasetId": "users"})).await;
        assert_eq!(body["fields"][0], json!({"name": "id", "type": "number", "isKey": true, "isLookupKey": true}));
        assert_eq!(body["keyField"], "id");
    }

    #[tokio::test]
    async fn query_returns_projected_rows_and_metadata() {
        let (_dir, service) = service();
        let body = call(
            &service,
            "query_dataset",
            json!({"datasetId": "users", "filter": {"field": "active", "op": "eq", "value": true}}),
        )
        .await;
        assert_eq!(body["rows"], json!([{"id": 1, "name": "Alice"}]));
        assert_eq!(body["count"], 1);
        assert_eq!(body["totalMatched"], 1);
        assert_eq!(body["truncated"], false);
        assert_eq!(body["limitApplied"], true);
        assert_eq!(body["fields"], json!(["id", "name"]));
    }

    #[tokio::test]
    async fn query_with_limit_reports_truncation() {
        let (_dir, service) = service();
        let body = call(
            &service,
            "query_dataset",
            json!({"datasetId": "users", "limit": 1, "filter": null}),
        )
        .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["totalMatched"], 2);
        assert_eq!(body["truncated"], true);
    }

    #[tokio::test]
    async fn invalid_field_is_an_invalid_request() {
        let (_dir, service) = service();
        let err = fail(
            &service,
            "query_dataset",
            json!({"datasetId": "users", "filter": {"field": "missing", "op": "eq", "value": 1}}),
        )
        .await;
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.to_string(),
            "Invalid field: 'missing'. Valid fields are: id, name, active"
        );
    }

    #[tokio::test]
    async fn malformed_filter_is_an_invalid_request() {
        let (_dir, service) = service();
        let err = fail(
            &service,
            "query_dataset",
            json!({"datasetId": "users", "filter": {"and": []}}),
        )
        .await;
        assert!(matches!(err, OperationError::InvalidFilter(_)));
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn unknown_dataset_is_not_found() {
        let (_dir, service) = service();
        let err = fail(&service, "describe_dataset", json!({"datasetId": "ghost"})).await;
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn argument_errors_are_invalid_requests() {
        let (_dir, service) = service();
        for (tool, args) in [
            ("describe_dataset", json!({})),
            ("describe_dataset", json!({"datasetId": ""})),
            ("query_dataset", json!({"datasetId": 7})),
            ("query_dataset", json!({"datasetId": "users", "limit": "ten"})),
            ("get_by_id", json!({"datasetId": "users"})),
            ("get_by_id", json!({"datasetId": "users", "id": true})),
        ] {
            let err = fail(&service, tool, args).await;
            assert_eq!(err.code(), ErrorCode::InvalidRequest, "{tool}: {err}");
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let (_dir, service) = service();
        let err = fail(&service, "drop_dataset", json!({})).await;
        assert!(matches!(err, OperationError::UnknownTool { ref name } if name == "drop_dataset"));
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn get_by_id_accepts_string_and_number_keys() {
        let (_dir, service) = service();
        let body = call(&service, "get_by_id", json!({"datasetId": "users", "id": "2"})).await;
        assert_eq!(body, json!({"rows": [{"id": 2, "name": "Bob"}], "count": 1, "fields": ["id", "name"]}));

        let body = call(
            &service,
            "get_by_id",
            json!({"datasetId": "users", "id": 1, "selectFields": ["active"]}),
        )
        .await;
        assert_eq!(body["rows"], json!([{"active": true}]));
    }

    #[tokio::test]
    async fn get_by_id_miss_is_empty() {
        let (_dir, service) = service();
        let body = call(&service, "get_by_id", json!({"datasetId": "users", "id": 99})).await;
        assert_eq!(body, json!({"rows": [], "count": 0, "fields": ["id", "name"]}));
    }

    #[tokio::test]
    async fn uninitialized_controller_is_not_ready() {
        let (_dir, path) = fixture();
        let service = CatalogService::new(Arc::new(ReloadController::new(&path)));
        let err = fail(&service, "list_datasets", json!({})).await;
        assert!(matches!(err, OperationError::NotReady { .. }));
        assert_eq!(err.code(), ErrorCode::ServerError);
    }

    #[tokio::test]
    async fn missing_csv_is_a_server_error() {
        let (dir, service) = service();
        std::fs::remove_file(dir.path().join("users.csv")).unwrap();
        let err = fail(&service, "query_dataset", json!({"datasetId": "users"})).await;
        assert_eq!(err.code(), ErrorCode::ServerError);
    }
}
