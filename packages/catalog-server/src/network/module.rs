//! Network module with deferred startup lifecycle.
//!
//! `new()` captures configuration and the tool service, `start()` binds the
//! TCP listener, and `serve()` accepts connections until shutdown. Binding
//! before serving lets the caller learn an OS-assigned port first.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{
    call_tool_handler, health_handler, list_tools_handler, liveness_handler, readiness_handler,
    AppState,
};
use super::middleware::build_http_layers;
use crate::service::CatalogService;

/// Owns the HTTP server lifecycle for one [`CatalogService`].
pub struct NetworkModule {
    config: NetworkConfig,
    service: CatalogService,
    listener: Option<TcpListener>,
    start_time: Instant,
}

impl NetworkModule {
    /// Creates a network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, service: CatalogService) -> Self {
        Self {
            config,
            service,
            listener: None,
            start_time: Instant::now(),
        }
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health` -- lifecycle state, generation, dataset count, uptime
    /// - `GET /health/live` -- liveness probe
    /// - `GET /health/ready` -- readiness probe
    /// - `GET /tools` -- tool metadata
    /// - `POST /tools/{name}` -- tool invocation
    pub fn build_router(&self) -> Router {
        let state = AppState {
            service: self.service.clone(),
            config: Arc::new(self.config.clone()),
            start_time: self.start_time,
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/tools", get(list_tools_handler))
            .route("/tools/{name}", post(call_tool_handler))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener and returns the bound port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then waits for in-flight
    /// requests and shuts the reload controller down.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener.take() else {
            anyhow::bail!("start() must be called before serve()");
        };
        let router = self.build_router();

        info!("serving HTTP connections");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        self.service.controller().shutdown();
        Ok(())
    }
}
