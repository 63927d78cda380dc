//! Normalization phase metrics

use crate::metrics::{describe_all, phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::pipeline::processing::normalize::RecordFormat;

/// Metrics collection for the normalization phase
pub struct NormalizeMetrics;

impl NormalizeMetrics {
    /// One record of `format` was mapped into `slots` unified slots
    pub fn record_mapped(format: RecordFormat, slots: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "normalize", "records_mapped"), "format" => format.label())
            .increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "normalize", "slots_per_record"), "format" => format.label())
            .record(slots as f64);
        ::metrics::histogram!(phase_metric!(histogram, "normalize", "record_duration_seconds"))
            .record(duration_secs);
    }

    /// A record was dropped; `kind` is the error kind label
    pub fn record_skipped(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "normalize", "records_skipped"), "kind" => kind)
            .increment(1);
    }

    /// A whole batch finished
    pub fn record_batch(records: usize, slots: usize) {
        ::metrics::counter!(phase_metric!(counter, "normalize", "batches")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "normalize", "slots_produced")).increment(slots as u64);
        ::metrics::histogram!(phase_metric!(histogram, "normalize", "batch_records")).record(records as f64);
    }
}

impl PhaseMetrics for NormalizeMetrics {
    fn register_metrics() {
        describe_all(&Self::metrics_documentation());
    }

    fn phase_name() -> &'static str {
        "normalize"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "normalize", "records_mapped"),
                metric_type: MetricType::Counter,
                help: "Records successfully mapped into unified slots",
                labels: vec!["format"],
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "records_skipped"),
                metric_type: MetricType::Counter,
                help: "Records dropped because their shape was unknown or malformed",
                labels: vec!["kind"],
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "batches"),
                metric_type: MetricType::Counter,
                help: "Normalization calls",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "slots_produced"),
                metric_type: MetricType::Counter,
                help: "Unified slots produced across all batches",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "normalize", "slots_per_record"),
                metric_type: MetricType::Histogram,
                help: "Unified slots produced per upstream record",
                labels: vec!["format"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "normalize", "record_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent mapping a single record",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "normalize", "batch_records"),
                metric_type: MetricType::Histogram,
                help: "Upstream records per normalization call",
                labels: vec![],
            },
        ]
    }
}
