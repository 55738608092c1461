//! Projection of domain records into gauge samples.

use std::sync::Arc;

use crate::cache::DomainCache;
use crate::domain::DomainListResponse;

/// The exported metric catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainMetric {
    /// `domain_auto_renew_enable{domain}`
    AutoRenewEnable,
    /// `domain_dnssec_key_count{domain}`
    DnssecKeyCount,
    /// `domain_expiry_timestamp_seconds{domain,status}`
    ExpiryTimestampSeconds,
    /// `domain_name_server_info{domain,name_server_info}`
    NameServerInfo,
}

impl DomainMetric {
    /// Every metric, in exposition order.
    pub const ALL: [DomainMetric; 4] = [
        DomainMetric::AutoRenewEnable,
        DomainMetric::DnssecKeyCount,
        DomainMetric::ExpiryTimestampSeconds,
        DomainMetric::NameServerInfo,
    ];

    /// Metric name.
    pub fn name(&self) -> &'static str {
        match self {
            DomainMetric::AutoRenewEnable => "domain_auto_renew_enable",
            DomainMetric::DnssecKeyCount => "domain_dnssec_key_count",
            DomainMetric::ExpiryTimestampSeconds => "domain_expiry_timestamp_seconds",
            DomainMetric::NameServerInfo => "domain_name_server_info",
        }
    }

    /// HELP text.
    pub fn help(&self) -> &'static str {
        match self {
            DomainMetric::AutoRenewEnable => "Domain auto-renewal status",
            DomainMetric::DnssecKeyCount => "Number of DNSSEC keys per domain",
            DomainMetric::ExpiryTimestampSeconds => "Domain expiry timestamp in seconds",
            DomainMetric::NameServerInfo => "Domain name server info",
        }
    }

    /// Label names, in the order sample label values are given.
    pub fn label_names(&self) -> &'static [&'static str] {
        match self {
            DomainMetric::AutoRenewEnable | DomainMetric::DnssecKeyCount => &["domain"],
            DomainMetric::ExpiryTimestampSeconds => &["domain", "status"],
            DomainMetric::NameServerInfo => &["domain", "name_server_info"],
        }
    }
}

/// One gauge sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Which metric this sample belongs to
    pub metric: DomainMetric,
    /// Label values, aligned with `metric.label_names()`
    pub label_values: Vec<String>,
    /// Gauge value
    pub value: f64,
}

impl Sample {
    fn new(metric: DomainMetric, label_values: Vec<String>, value: f64) -> Self {
        Sample {
            metric,
            label_values,
            value,
        }
    }
}

/// Maps a domain list into samples.
///
/// Records whose status is not OK (typically deleted or expired-out
/// domains) are skipped entirely.
pub fn project(response: &DomainListResponse) -> Vec<Sample> {
    let mut samples = Vec::new();

    for domain in response.ok_domains() {
        let name = &domain.domain_name;

        samples.push(Sample::new(
            DomainMetric::AutoRenewEnable,
            vec![name.clone()],
            domain.auto_renew as f64,
        ));
        samples.push(Sample::new(
            DomainMetric::DnssecKeyCount,
            vec![name.clone()],
            domain.dnssec_keys.len() as f64,
        ));
        samples.push(Sample::new(
            DomainMetric::ExpiryTimestampSeconds,
            vec![name.clone(), domain.domain_status.clone()],
            domain.expiry_timestamp() as f64,
        ));
        for server in &domain.name_servers {
            samples.push(Sample::new(
                DomainMetric::NameServerInfo,
                vec![name.clone(), server.clone()],
                1.0,
            ));
        }
    }

    samples
}

/// Produces the current sample set on each scrape.
pub struct DomainExporter {
    cache: Arc<DomainCache>,
}

impl DomainExporter {
    /// Creates an exporter reading through `cache`.
    pub fn new(cache: Arc<DomainCache>) -> Self {
        DomainExporter { cache }
    }

    /// Current samples; never fails (an unreachable upstream yields whatever
    /// the cache still holds, possibly nothing).
    pub async fn collect(&self) -> Vec<Sample> {
        let response = self.cache.get().await;
        project(&response)
    }
}
