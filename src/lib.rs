//! synergy_wholesale_exporter library: Prometheus exporter for a Synergy
//! Wholesale reseller account
//!
//! Each scrape reads the account's domain list through a TTL cache that
//! sits in front of the upstream SOAP API, and projects the records into
//! four gauge families plus `build_info`.
//!
//! # Example
//!
//! ```no_run
//! use synergy_wholesale_exporter::{run_exporter, Config, Credentials};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     cache_ttl: Duration::from_secs(900),
//!     ..Config::new(Credentials::new("1234", "secret"))
//! };
//!
//! run_exporter(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod metrics;
pub mod soap;
pub mod status_server;

// Re-export public API
pub use api::{ApiClient, DomainSource};
pub use cache::DomainCache;
pub use config::{Config, Credentials, LogFormat, LogLevel, Opt};
pub use metrics::DomainExporter;
pub use run::run_exporter;

mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::info;

    use crate::api::ApiClient;
    use crate::cache::DomainCache;
    use crate::config::Config;
    use crate::initialization::init_client;
    use crate::metrics::DomainExporter;
    use crate::status_server::{start_status_server, ServerState};

    /// Runs the exporter until Ctrl-C.
    ///
    /// Builds the upstream client, the cache and the metrics server, then
    /// serves scrapes. Nothing talks to the upstream API until the first
    /// scrape arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the listen
    /// address cannot be bound.
    pub async fn run_exporter(config: Config) -> Result<()> {
        let client =
            init_client(config.upstream_timeout).context("Failed to initialize HTTP client")?;
        let api = ApiClient::new(client, config.credentials.clone());

        info!(
            "Starting synergy_wholesale_exporter (version={}, reseller_id={}, cache_ttl={}s)",
            env!("CARGO_PKG_VERSION"),
            api.reseller_id(),
            config.cache_ttl.as_secs()
        );

        let cache = DomainCache::new(Arc::new(api), config.cache_ttl);
        let state = ServerState::new(DomainExporter::new(Arc::new(cache)));

        start_status_server(config.listen_address, state, shutdown_signal()).await?;

        info!("Shutdown complete");
        Ok(())
    }

    async fn shutdown_signal() {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => {
                log::warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
