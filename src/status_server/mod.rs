//! HTTP server for Prometheus scrapes and orchestrator probes.
//!
//! Provides three endpoints:
//! - `/metrics` - domain metrics in the Prometheus text format
//! - `/liveness` - empty 200 response
//! - `/readiness` - empty 200 response

mod handlers;
mod types;

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;

use handlers::{metrics_handler, probe_handler};
pub use types::ServerState;

/// Builds the router for the exporter endpoints.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/liveness", get(probe_handler))
        .route("/readiness", get(probe_handler))
        .with_state(state)
}

/// Binds `addr` and serves until `shutdown` resolves.
pub async fn start_status_server(
    addr: SocketAddr,
    state: ServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind metrics server to {}: {}", addr, e))?;

    let local_addr = listener.local_addr().unwrap_or(addr);
    log::info!("Starting web server (listen_address={})", local_addr);
    log::info!("  - Metrics: http://{}/metrics", local_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Metrics server error: {}", e))?;

    Ok(())
}
