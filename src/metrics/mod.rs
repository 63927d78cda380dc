//! Centralized metrics for the slot sync service
//!
//! Each phase (upstream sources, normalization, the public API) defines its
//! metrics in a dedicated submodule. Names follow
//! `slot_sync_{phase}_{metric}[_total]`.

pub mod api;
pub mod normalize;
pub mod registry;
pub mod sources;

pub use api::ApiMetrics;
pub use normalize::NormalizeMetrics;
pub use sources::SourcesMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register every phase's metrics.
///
/// Idempotent. No HTTP listener is started; the exposition is rendered by
/// the service's own `/metrics` route through [`render`].
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already stored");
                return;
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    }
}

/// Render the current metrics in Prometheus text format, if a recorder is installed
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase (descriptions and units)
    fn register_metrics();

    /// Get the phase name for prefixing metrics
    fn phase_name() -> &'static str;

    /// Get documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Build phase metric names with consistent naming:
/// slot_sync_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("slot_sync_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("slot_sync_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

/// Register a phase's documented metrics with the installed recorder
pub(crate) fn describe_all(docs: &[MetricDoc]) {
    for doc in docs {
        match doc.metric_type {
            MetricType::Counter => ::metrics::describe_counter!(doc.name, doc.help),
            MetricType::Histogram => ::metrics::describe_histogram!(doc.name, doc.help),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_naming_convention() {
        assert_eq!(
            phase_metric!(counter, "normalize", "records_skipped"),
            "slot_sync_normalize_records_skipped_total"
        );
        assert_eq!(
            phase_metric!(histogram, "sources", "fetch_duration_seconds"),
            "slot_sync_sources_fetch_duration_seconds"
        );
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        NormalizeMetrics::record_batch(3, 7);
        SourcesMetrics::record_fetch_error("local", "upstream");
        ApiMetrics::record_auth_failure("missing_header");
    }
}
