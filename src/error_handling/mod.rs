//! Error handling.
//!
//! Error types are split by where they surface:
//! - **Initialization**: logger and HTTP client setup
//! - **Configuration**: missing credentials or bad listen address (fatal at startup)
//! - **API**: one failed upstream exchange (recovered by the cache)

mod types;

// Re-export public API
pub use types::{ApiError, ConfigError, InitializationError};
