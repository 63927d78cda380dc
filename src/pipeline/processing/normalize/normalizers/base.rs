use std::time::Instant;
use tracing::debug;

use crate::metrics::normalize::NormalizeMetrics;
use crate::pipeline::processing::normalize::detect::RecordFormat;
use crate::pipeline::processing::normalize::UnifiedSlot;

/// Base trait for format-specific normalizers.
///
/// Implementations map an already decoded record to unified slots. Mapping
/// itself cannot fail; anything that could go wrong was caught while
/// decoding the record.
pub trait SourceNormalizer: Send + Sync {
    /// The typed upstream record this normalizer understands
    type Record;

    /// Produce one unified slot per time entry, in the record's order
    fn normalize(&self, record: &Self::Record) -> Vec<UnifiedSlot>;

    /// The upstream format this normalizer handles
    fn format(&self) -> RecordFormat;

    /// Get a human-readable name for this normalizer
    fn name(&self) -> &str;
}

/// A wrapper that adds metrics to any normalizer implementation
pub struct MetricsNormalizer<N: SourceNormalizer> {
    inner: N,
}

impl<N: SourceNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: SourceNormalizer> SourceNormalizer for MetricsNormalizer<N> {
    type Record = N::Record;

    fn normalize(&self, record: &Self::Record) -> Vec<UnifiedSlot> {
        let start_time = Instant::now();
        let slots = self.inner.normalize(record);
        debug!(normalizer = self.inner.name(), "Mapped record into {} slots", slots.len());
        NormalizeMetrics::record_mapped(
            self.inner.format(),
            slots.len(),
            start_time.elapsed().as_secs_f64(),
        );
        slots
    }

    fn format(&self) -> RecordFormat {
        self.inner.format()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
