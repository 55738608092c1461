//! Configuration constants.
//!
//! This module defines the fixed upstream endpoint, the SOAP namespaces the
//! upstream server validates against, and the defaults for every CLI option.

/// Synergy Wholesale SOAP endpoint. Not configurable from the command line.
pub const API_URL: &str = "https://api.synergywholesale.com";

/// Content type sent with every upstream request.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

// SOAP namespaces
// The upstream server validates the envelope structurally, so these must
// match byte for byte.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const API_NS: &str = "http://api.synergywholesale.com";
pub const APACHE_MAP_NS: &str = "http://xml.apache.org/xml-soap";

/// Default cache TTL: 1 hour
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Deadline for one upstream exchange (connect + request + body).
///
/// A slow upstream response holds every pending scrape behind the
/// single-flight refresh, so the exchange is bounded.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default listen address (all interfaces, port 8080)
pub const DEFAULT_LISTEN_ADDRESS: &str = ":8080";

// Environment variable fallbacks for credentials
pub const ENV_RESELLER_ID: &str = "SYNERGY_WHOLESALE_RESELLER_ID";
pub const ENV_API_KEY: &str = "SYNERGY_WHOLESALE_API_KEY";

/// Upstream dates carry no zone. Empirically they are Australia/Brisbane,
/// which has been UTC+10 without daylight saving since 1992.
pub const UPSTREAM_UTC_OFFSET_SECS: i32 = 10 * 60 * 60;

/// Layout of upstream date strings (`YYYY-MM-DD HH:MM:SS`).
pub const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status string the upstream reports for a healthy record or response.
pub const STATUS_OK: &str = "OK";
