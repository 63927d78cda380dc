use super::base::SourceNormalizer;
use crate::pipeline::processing::normalize::dates::normalize_date;
use crate::pipeline::processing::normalize::detect::RecordFormat;
use crate::pipeline::processing::normalize::records::FormatCRecord;
use crate::pipeline::processing::normalize::UnifiedSlot;

/// Normalizer for format C records (`appointment_day` / `free_slots` / `physician_name`)
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatCNormalizer;

impl SourceNormalizer for FormatCNormalizer {
    type Record = FormatCRecord;

    fn normalize(&self, record: &FormatCRecord) -> Vec<UnifiedSlot> {
        let date = normalize_date(&record.appointment_day);
        record
            .free_slots
            .iter()
            .map(|time| UnifiedSlot::new(date.clone(), time.clone(), record.physician_name.clone()))
            .collect()
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::C
    }

    fn name(&self) -> &str {
        "Physician Slots Normalizer"
    }
}
