//! Registers every phase's metrics and detects naming conflicts early

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{info, warn};

/// Register all metrics from all phases
pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::sources::SourcesMetrics>(&mut all_metrics);
    register_phase_metrics::<super::normalize::NormalizeMetrics>(&mut all_metrics);
    register_phase_metrics::<super::api::ApiMetrics>(&mut all_metrics);

    info!(
        "Registered {} total metrics across all phases",
        all_metrics.len()
    );
}

/// Register metrics for a specific phase and detect conflicts
fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, (&'static str, MetricDoc)>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if let Some((existing_phase, _)) = all_metrics.get(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' is defined in both '{}' and '{}'",
                doc.name, existing_phase, phase_name
            );
        } else {
            all_metrics.insert(doc.name, (phase_name, doc));
        }
    }
}

/// Extract phase name from metric name (e.g. "slot_sync_sources_fetch_success_total" -> "sources")
pub fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("slot_sync_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{ApiMetrics, NormalizeMetrics, SourcesMetrics};
    use std::collections::HashSet;

    #[test]
    fn test_extract_phase_from_metric_name() {
        assert_eq!(
            extract_phase_from_metric_name("slot_sync_sources_fetch_success_total"),
            "sources"
        );
        assert_eq!(
            extract_phase_from_metric_name("slot_sync_normalize_slots_per_record"),
            "normalize"
        );
        assert_eq!(extract_phase_from_metric_name("invalid_metric_name"), "unknown");
    }

    #[test]
    fn test_metric_names_are_unique_and_match_their_phase() {
        let mut docs = SourcesMetrics::metrics_documentation();
        docs.extend(NormalizeMetrics::metrics_documentation());
        docs.extend(ApiMetrics::metrics_documentation());

        let names: HashSet<&str> = docs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), docs.len());

        for doc in SourcesMetrics::metrics_documentation() {
            assert_eq!(extract_phase_from_metric_name(doc.name), SourcesMetrics::phase_name());
        }
        for doc in NormalizeMetrics::metrics_documentation() {
            assert_eq!(extract_phase_from_metric_name(doc.name), NormalizeMetrics::phase_name());
        }
        for doc in ApiMetrics::metrics_documentation() {
            assert_eq!(extract_phase_from_metric_name(doc.name), ApiMetrics::phase_name());
        }
    }
}
