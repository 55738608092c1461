//! Prometheus text exposition of a sample set.
//!
//! Samples are rebuilt into a fresh registry on every scrape, so domains
//! that leave the account disappear from the output immediately.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use super::projector::{DomainMetric, Sample};

/// Name of the build information gauge.
pub const BUILD_INFO_METRIC: &str = "build_info";

/// Renders `samples` plus `build_info` in the text exposition format.
///
/// Returns the content type and body.
pub fn render(samples: &[Sample]) -> Result<(String, Vec<u8>), prometheus::Error> {
    let registry = Registry::new();

    let build_info = GaugeVec::new(
        Opts::new(BUILD_INFO_METRIC, "Application build information"),
        &["version"],
    )?;
    build_info
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1.0);
    registry.register(Box::new(build_info))?;

    for metric in DomainMetric::ALL {
        let gauge = GaugeVec::new(Opts::new(metric.name(), metric.help()), metric.label_names())?;
        for sample in samples.iter().filter(|s| s.metric == metric) {
            gauge
                .get_metric_with_label_values(sample.label_values.as_slice())?
                .set(sample.value);
        }
        registry.register(Box::new(gauge))?;
    }

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok((encoder.format_type().to_string(), buffer))
}
