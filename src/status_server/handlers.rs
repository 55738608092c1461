//! Status server HTTP handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::types::ServerState;
use crate::metrics::render;

/// Prometheus scrape endpoint.
///
/// Always answers 200 with whatever the cache can provide; an unreachable
/// upstream only empties the domain series.
pub async fn metrics_handler(State(state): State<ServerState>) -> Response {
    let samples = state.exporter.collect().await;

    match render(&samples) {
        Ok((content_type, body)) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            log::error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Liveness and readiness probes: blank 200.
pub async fn probe_handler() -> StatusCode {
    StatusCode::OK
}
