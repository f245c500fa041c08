// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use fluxgate_core::{FluxgateError, ObjectStore, RequestStore};
use fluxgate_processor::RequestProcessor;

use crate::handlers;

/// Health state for the liveness endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The request processor driving the relay endpoint.
    pub processor: Arc<RequestProcessor>,
    /// Row store, for the list endpoint.
    pub requests: Arc<dyn RequestStore>,
    /// Blob store, for the image download endpoint.
    pub objects: Arc<dyn ObjectStore>,
    /// Health state for the liveness endpoint.
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(
        processor: Arc<RequestProcessor>,
        requests: Arc<dyn RequestStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            processor,
            requests,
            objects,
            health: HealthState {
                start_time: Instant::now(),
            },
        }
    }
}

/// Gateway server configuration (mirrors ServerConfig from fluxgate-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Routes:
/// - POST /v1/process (the relay endpoint; axum answers any other method on
///   this path with 405 without invoking a handler)
/// - GET /v1/requests (list records for a user)
/// - GET /v1/images/{path} (download a generated image)
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/process", post(handlers::post_process))
        .route("/v1/requests", get(handlers::list_requests))
        .route("/v1/images/{*path}", get(handlers::get_image))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until a shutdown signal.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), FluxgateError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FluxgateError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FluxgateError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server should keep running.
            tracing::warn!(error = %e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("8080"));
    }
}
