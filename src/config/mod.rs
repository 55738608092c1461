//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoint, namespaces, defaults)
//! - CLI option types and parsing
//! - The library `Config` and upstream `Credentials`

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_listen_address, Config, Credentials, LogFormat, LogLevel, Opt};
