use super::base::SourceNormalizer;
use crate::pipeline::processing::normalize::dates::normalize_date;
use crate::pipeline::processing::normalize::detect::RecordFormat;
use crate::pipeline::processing::normalize::records::FormatARecord;
use crate::pipeline::processing::normalize::UnifiedSlot;

/// Normalizer for format A records (`date` / `times` / `doctor`)
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatANormalizer;

impl SourceNormalizer for FormatANormalizer {
    type Record = FormatARecord;

    fn normalize(&self, record: &FormatARecord) -> Vec<UnifiedSlot> {
        let date = normalize_date(&record.date);
        record
            .times
            .iter()
            .map(|time| UnifiedSlot::new(date.clone(), time.clone(), record.doctor.name.clone()))
            .collect()
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::A
    }

    fn name(&self) -> &str {
        "Doctor Times Normalizer"
    }
}
