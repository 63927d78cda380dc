//! Public API metrics

use crate::metrics::{describe_all, phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Metrics collection for the HTTP surface
pub struct ApiMetrics;

impl ApiMetrics {
    pub fn record_slots_served(returned: usize, total: usize) {
        ::metrics::counter!(phase_metric!(counter, "api", "slot_requests")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "api", "slots_returned")).record(returned as f64);
        ::metrics::histogram!(phase_metric!(histogram, "api", "slots_matched")).record(total as f64);
    }

    pub fn record_unavailable() {
        ::metrics::counter!(phase_metric!(counter, "api", "unavailable")).increment(1);
    }

    pub fn record_auth_failure(reason: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "api", "auth_failures"), "reason" => reason).increment(1);
    }
}

impl PhaseMetrics for ApiMetrics {
    fn register_metrics() {
        describe_all(&Self::metrics_documentation());
    }

    fn phase_name() -> &'static str {
        "api"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "api", "slot_requests"),
                metric_type: MetricType::Counter,
                help: "Successful available-slot listings",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "api", "unavailable"),
                metric_type: MetricType::Counter,
                help: "Listings answered with 503 because the upstream failed",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "api", "auth_failures"),
                metric_type: MetricType::Counter,
                help: "Rejected Basic-Auth attempts against the mock upstream",
                labels: vec!["reason"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "api", "slots_returned"),
                metric_type: MetricType::Histogram,
                help: "Slots on the returned page",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "api", "slots_matched"),
                metric_type: MetricType::Histogram,
                help: "Slots matching the filters before pagination",
                labels: vec![],
            },
        ]
    }
}
