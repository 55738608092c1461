//! Domain metrics: projection of cached records into gauge samples, and
//! their Prometheus text rendering.
//!
//! | Metric | Labels |
//! |---|---|
//! | `domain_auto_renew_enable` | `domain` |
//! | `domain_dnssec_key_count` | `domain` |
//! | `domain_expiry_timestamp_seconds` | `domain`, `status` |
//! | `domain_name_server_info` | `domain`, `name_server_info` |

mod exposition;
mod projector;

pub use exposition::{render, BUILD_INFO_METRIC};
pub use projector::{project, DomainExporter, DomainMetric, Sample};
