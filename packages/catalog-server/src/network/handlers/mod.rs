//! HTTP handlers and the shared state they extract.

pub mod error;
pub mod health;
pub mod tools;

pub use error::ApiError;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use tools::{call_tool_handler, list_tools_handler};

use std::sync::Arc;
use std::time::Instant;

use super::NetworkConfig;
use crate::service::CatalogService;

/// Shared application state passed to all axum handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Tool service over the reload controller's active snapshot.
    pub service: CatalogService,
    /// Network configuration; `/health` reports its bind address.
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
