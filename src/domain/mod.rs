//! Domain inventory records as reported by the upstream account.
//!
//! Key items:
//! - `DomainRecord` - one domain in the account
//! - `DomainListResponse` - the result of a "list domains" call
//! - `upstream_timestamp()` - interprets upstream date strings as UTC epoch seconds

use chrono::{FixedOffset, NaiveDateTime, TimeZone};

use crate::config::{STATUS_OK, UPSTREAM_DATE_FORMAT, UPSTREAM_UTC_OFFSET_SECS};

/// One domain in the reseller account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRecord {
    /// Per-record status; only `"OK"` records are exported.
    pub status: String,
    /// Upstream error text, present when `status` is not OK.
    pub error_message: Option<String>,
    /// Fully qualified domain name
    pub domain_name: String,
    /// Registry status (e.g. `ok`, `clientTransferProhibited`)
    pub domain_status: String,
    /// Creation date, `YYYY-MM-DD HH:MM:SS` in upstream local time
    pub domain_created: String,
    /// Expiry date, `YYYY-MM-DD HH:MM:SS` in upstream local time
    pub domain_expiry: String,
    /// Date the domain was added to the account
    pub created_date: String,
    /// Transfer state, when a transfer is in progress
    pub transfer_status: String,
    /// 1 when auto-renew is enabled
    pub auto_renew: i64,
    /// Delegated name servers, in upstream order
    pub name_servers: Vec<String>,
    /// DNSSEC key identifiers
    pub dnssec_keys: Vec<String>,
}

impl DomainRecord {
    /// Whether the upstream reported this record as healthy.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Expiry as UTC epoch seconds, 0 when missing or unparseable.
    pub fn expiry_timestamp(&self) -> i64 {
        upstream_timestamp(&self.domain_expiry)
    }

    /// Creation as UTC epoch seconds, 0 when missing or unparseable.
    pub fn creation_timestamp(&self) -> i64 {
        upstream_timestamp(&self.domain_created)
    }
}

/// Result of a "list domains" call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainListResponse {
    /// Top-level status
    pub status: String,
    /// Top-level error text, when `status` is not OK
    pub error_message: Option<String>,
    /// Every record the upstream returned, healthy or not
    pub domains: Vec<DomainRecord>,
}

impl DomainListResponse {
    /// Whether the upstream reported the call as successful.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Records eligible for export.
    pub fn ok_domains(&self) -> impl Iterator<Item = &DomainRecord> {
        self.domains.iter().filter(|d| d.is_ok())
    }
}

/// Converts an upstream date string to UTC epoch seconds.
///
/// Upstream dates carry no zone; they are read as fixed UTC+10
/// (Australia/Brisbane). Empty or unparseable input yields 0.
pub fn upstream_timestamp(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }
    let Ok(naive) = NaiveDateTime::parse_from_str(value, UPSTREAM_DATE_FORMAT) else {
        log::debug!("Unparseable upstream date {:?}", value);
        return 0;
    };
    FixedOffset::east_opt(UPSTREAM_UTC_OFFSET_SECS)
        .and_then(|zone| zone.from_local_datetime(&naive).single())
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}
