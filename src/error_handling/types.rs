//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Startup configuration errors. Fatal: the process does not serve traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `--reseller-id` nor `SYNERGY_WHOLESALE_RESELLER_ID` was set.
    #[error("Reseller ID not set (use --reseller-id or SYNERGY_WHOLESALE_RESELLER_ID)")]
    MissingResellerId,

    /// Neither `--apikey` nor `SYNERGY_WHOLESALE_API_KEY` was set.
    #[error("API Key not set (use --apikey or SYNERGY_WHOLESALE_API_KEY)")]
    MissingApiKey,

    /// The listen address could not be parsed.
    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    /// `--upstream-timeout 0` would fail every upstream request.
    #[error("Upstream timeout must be at least 1 second")]
    ZeroUpstreamTimeout,
}

/// Errors from one upstream exchange.
///
/// None of these reach the scrape path: the cache recovers from all of them.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection failure, timeout, or unreadable body.
    #[error("Transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// The upstream answered with a non-2xx status.
    #[error("Upstream returned HTTP {0}")]
    HttpStatus(u16),

    /// The request envelope could not be written.
    #[error("Failed to encode SOAP request: {0}")]
    Encode(String),

    /// Not well-formed XML, or the envelope/body/return nesting is missing.
    #[error("Malformed SOAP response: {0}")]
    MalformedResponse(String),

    /// The body carried a SOAP Fault instead of an operation response.
    #[error("SOAP fault {code}: {message}")]
    Fault {
        /// `faultcode` text
        code: String,
        /// `faultstring` text
        message: String,
    },
}

impl ApiError {
    /// Whether the failure happened before a response body was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::HttpStatus(_))
    }

    /// Whether the failure came from the response payload itself.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            ApiError::MalformedResponse(_) | ApiError::Fault { .. }
        )
    }
}
