use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

pub mod dates;
pub mod detect;
pub mod normalizers;
pub mod records;
pub mod validate;

pub use dates::normalize_date;
pub use detect::{detect_format, RecordFormat};
pub use records::RawSlotRecord;
pub use validate::{validate_normalized_data, validate_normalized_json};

use crate::metrics::normalize::NormalizeMetrics;
use normalizers::{FormatANormalizer, FormatBNormalizer, FormatCNormalizer, MetricsNormalizer, SourceNormalizer};

/// The one outbound shape of the normalizer, whatever format the upstream used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedSlot {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Start of the slot, `HH:MM` (24h)
    pub start_time: String,
    /// Display name of the provider offering the slot
    pub provider: String,
}

impl UnifiedSlot {
    pub fn new(date: impl Into<String>, start_time: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            provider: provider.into(),
        }
    }
}

/// Per-record failures. These never escape a batch: the orchestrator logs
/// them and drops the offending record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Unknown format detected in record {index}")]
    UnknownFormat { index: usize },

    #[error("Record {index} looks like format {format} but could not be decoded: {reason}")]
    MalformedRecord {
        index: usize,
        format: RecordFormat,
        reason: String,
    },
}

impl NormalizeError {
    pub fn index(&self) -> usize {
        match self {
            NormalizeError::UnknownFormat { index } => *index,
            NormalizeError::MalformedRecord { index, .. } => *index,
        }
    }

    /// Short stable label, used for metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::UnknownFormat { .. } => "unknown_format",
            NormalizeError::MalformedRecord { .. } => "malformed_record",
        }
    }
}

/// Summary of one normalization call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub records_seen: usize,
    pub records_skipped: usize,
    pub slots_produced: usize,
    #[serde(skip)]
    pub errors: Vec<NormalizeError>,
}

/// Normalizes a batch of untyped upstream records into unified slots.
///
/// Output order is input-record order, and within a record the order of its
/// time list. Records that match no known shape, or that match a shape but
/// cannot be decoded, are logged and skipped; they never fail the batch.
pub fn normalize(records: &[Value]) -> Vec<UnifiedSlot> {
    normalize_with_report(records).0
}

/// Same as [`normalize`], also returning what was skipped along the way
pub fn normalize_with_report(records: &[Value]) -> (Vec<UnifiedSlot>, NormalizationReport) {
    info!("Processing {} messy records", records.len());

    let mut report = NormalizationReport {
        records_seen: records.len(),
        ..Default::default()
    };

    let slots = records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .fold(Vec::new(), |mut acc, outcome| {
            match outcome {
                Ok(slots) => acc.extend(slots),
                Err(e) => {
                    error!(index = e.index(), kind = e.kind(), "Failed to normalize record: {}", e);
                    NormalizeMetrics::record_skipped(e.kind());
                    report.records_skipped += 1;
                    report.errors.push(e);
                }
            }
            acc
        });

    report.slots_produced = slots.len();
    NormalizeMetrics::record_batch(report.records_seen, report.slots_produced);
    info!("Successfully normalized {} appointment slots", slots.len());

    (slots, report)
}

/// Detects, decodes and maps a single record. All of a record's slots are
/// produced, or none.
pub fn normalize_record(index: usize, record: &Value) -> Result<Vec<UnifiedSlot>, NormalizeError> {
    let typed = RawSlotRecord::from_value(index, record)?;
    debug!(index, format = %typed.format(), "Decoded record");
    Ok(map_record(&typed))
}

/// Maps an already classified record
pub fn map_record(record: &RawSlotRecord) -> Vec<UnifiedSlot> {
    match record {
        RawSlotRecord::A(r) => MetricsNormalizer::new(FormatANormalizer).normalize(r),
        RawSlotRecord::B(r) => MetricsNormalizer::new(FormatBNormalizer).normalize(r),
        RawSlotRecord::C(r) => MetricsNormalizer::new(FormatCNormalizer).normalize(r),
    }
}
