//! Status server data structures.

use std::sync::Arc;

use crate::metrics::DomainExporter;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct ServerState {
    /// Source of the samples served on `/metrics`
    pub exporter: Arc<DomainExporter>,
}

impl ServerState {
    /// Wraps an exporter for the router.
    pub fn new(exporter: DomainExporter) -> Self {
        ServerState {
            exporter: Arc::new(exporter),
        }
    }
}
