//! Health, liveness, and readiness endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::catalog::LifecycleState;

/// Returns lifecycle state, served generation, dataset count, bind address,
/// and uptime.
///
/// Always returns 200; the `state` field tells whether a catalog is served.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let controller = state.service.controller();
    let snapshot = controller.snapshot();

    Json(json!({
        "state": controller.state().as_str(),
        "generation": snapshot.as_ref().map(|s| s.generation()),
        "datasets": snapshot.as_ref().map_or(0, |s| s.catalog().len()),
        "listen": state.config.bind_addr(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe: always 200 OK.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: 200 while a snapshot is served, 503 before initialization
/// and after shutdown.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    let controller = state.service.controller();
    let serving = matches!(
        controller.state(),
        LifecycleState::Active | LifecycleState::Reloading
    );
    if serving && controller.snapshot().is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::handlers::test_support::{active_state, idle_state};

    #[tokio::test]
    async fn health_handler_reports_active_catalog() {
        let (_dir, state) = active_state();

        let json = health_handler(State(state)).await.0;

        assert_eq!(json["state"], "active");
        assert_eq!(json["generation"], 1);
        assert_eq!(json["datasets"], 1);
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_handler_reports_bind_address() {
        let (_dir, mut state) = active_state();
        state.config = std::sync::Arc::new(crate::network::NetworkConfig {
            host: "0.0.0.0".to_string(),
            port: 9090,
            ..crate::network::NetworkConfig::default()
        });

        let json = health_handler(State(state)).await.0;

        assert_eq!(json["listen"], "0.0.0.0:9090");
    }

    #[tokio::test]
    async fn health_handler_reports_uninitialized_state() {
        let (_dir, state) = idle_state();

        let json = health_handler(State(state)).await.0;

        assert_eq!(json["state"], "uninitialized");
        assert!(json["generation"].is_null());
        assert_eq!(json["datasets"], 0);
    }

    #[tokio::test]
    async fn liveness_handler_always_returns_200() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_handler_returns_200_when_serving() {
        let (_dir, state) = active_state();
        assert_eq!(readiness_handler(State(state)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_handler_returns_503_before_initialize() {
        let (_dir, state) = idle_state();
        assert_eq!(
            readiness_handler(State(state)).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn readiness_handler_returns_503_after_shutdown() {
        let (_dir, state) = active_state();
        state.service.controller().shutdown();

        assert_eq!(
            readiness_handler(State(state.clone())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(health_handler(State(state)).await.0["state"], "shutdown");
    }
}
