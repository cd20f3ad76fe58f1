//! Tool discovery and invocation endpoints.

use axum::extract::{Path, State};
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::service::ErrorCode;

/// `GET /tools`: metadata for every tool.
pub async fn list_tools_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "tools": state.service.tools() }))
}

/// `POST /tools/{name}`: runs a tool with the JSON body as its arguments.
///
/// An empty body is treated as `{}`.
///
/// # Errors
///
/// Returns [`ApiError`] for malformed JSON bodies and failed tool calls.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let args = parse_body(&body)?;
    let result = state.service.call_tool(&name, args).await?;
    Ok(Json(result))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            ErrorCode::InvalidRequest,
            format!("Request body is not valid JSON: {e}"),
        )
    })
}
