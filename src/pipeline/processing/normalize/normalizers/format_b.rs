use super::base::SourceNormalizer;
use crate::pipeline::processing::normalize::dates::normalize_date;
use crate::pipeline::processing::normalize::detect::RecordFormat;
use crate::pipeline::processing::normalize::records::FormatBRecord;
use crate::pipeline::processing::normalize::UnifiedSlot;

/// Normalizer for format B records (`available_on` / `slots` / `provider`).
/// Only the start of each range is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatBNormalizer;

impl SourceNormalizer for FormatBNormalizer {
    type Record = FormatBRecord;

    fn normalize(&self, record: &FormatBRecord) -> Vec<UnifiedSlot> {
        let date = normalize_date(&record.available_on);
        record
            .slots
            .iter()
            .map(|range| UnifiedSlot::new(date.clone(), range.start.clone(), record.provider.clone()))
            .collect()
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::B
    }

    fn name(&self) -> &str {
        "Provider Ranges Normalizer"
    }
}
