//! Upstream source metrics: fetches against the scheduling system

use crate::metrics::{describe_all, phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Metrics collection for upstream slot sources
pub struct SourcesMetrics;

impl SourcesMetrics {
    pub fn record_fetch_success(source: &'static str, records: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "sources", "fetch_success"), "source" => source).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "sources", "fetch_duration_seconds"), "source" => source)
            .record(duration_secs);
        ::metrics::histogram!(phase_metric!(histogram, "sources", "records_per_fetch"), "source" => source)
            .record(records as f64);
    }

    pub fn record_fetch_error(source: &'static str, error_type: &'static str) {
        ::metrics::counter!(
            phase_metric!(counter, "sources", "fetch_error"),
            "source" => source,
            "error_type" => error_type
        )
        .increment(1);
    }

    /// The emulator fell back to its built-in appointments
    pub fn record_fixture_fallback() {
        ::metrics::counter!(phase_metric!(counter, "sources", "fixture_fallbacks")).increment(1);
    }
}

impl PhaseMetrics for SourcesMetrics {
    fn register_metrics() {
        describe_all(&Self::metrics_documentation());
    }

    fn phase_name() -> &'static str {
        "sources"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "sources", "fetch_success"),
                metric_type: MetricType::Counter,
                help: "Successful fetches from the upstream scheduling system",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "sources", "fetch_error"),
                metric_type: MetricType::Counter,
                help: "Failed fetches from the upstream scheduling system",
                labels: vec!["source", "error_type"],
            },
            MetricDoc {
                name: phase_metric!(counter, "sources", "fixture_fallbacks"),
                metric_type: MetricType::Counter,
                help: "Times the emulator used its built-in appointments",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "sources", "fetch_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Duration of upstream fetches in seconds",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "sources", "records_per_fetch"),
                metric_type: MetricType::Histogram,
                help: "Raw records returned per upstream fetch",
                labels: vec!["source"],
            },
        ]
    }
}
