use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::detect::{matching_formats, RecordFormat};
use super::NormalizeError;

// Only the fields the mapping reads are typed. The rest are carried as raw
// JSON so an off-type value there never costs the record.

/// Format A: one doctor object, bare time strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatARecord {
    pub date: String,
    pub times: Vec<String>,
    pub doctor: Doctor,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// Format B: slashed dates and start/end ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatBRecord {
    pub available_on: String,
    pub slots: Vec<TimeRange>,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,
}

/// Format C: flat physician fields and a fixed duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCRecord {
    pub appointment_day: String,
    pub free_slots: Vec<String>,
    pub physician_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physician_code: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<Value>,
}

/// A classified upstream record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSlotRecord {
    A(FormatARecord),
    B(FormatBRecord),
    C(FormatCRecord),
}

impl RawSlotRecord {
    /// Classifies `record` by shape and decodes it into the matching variant
    pub fn from_value(index: usize, record: &Value) -> Result<Self, NormalizeError> {
        let matches = matching_formats(record);
        let format = *matches.first().ok_or(NormalizeError::UnknownFormat { index })?;

        if matches.len() > 1 {
            let labels: Vec<&str> = matches.iter().map(RecordFormat::label).collect();
            warn!(index, formats = ?labels, "Record matches several formats, using {}", format);
        }

        let malformed = |e: serde_json::Error| NormalizeError::MalformedRecord {
            index,
            format,
            reason: e.to_string(),
        };

        let typed = match format {
            RecordFormat::A => RawSlotRecord::A(FormatARecord::deserialize(record).map_err(malformed)?),
            RecordFormat::B => RawSlotRecord::B(FormatBRecord::deserialize(record).map_err(malformed)?),
            RecordFormat::C => RawSlotRecord::C(FormatCRecord::deserialize(record).map_err(malformed)?),
        };
        Ok(typed)
    }

    pub fn format(&self) -> RecordFormat {
        match self {
            RawSlotRecord::A(_) => RecordFormat::A,
            RawSlotRecord::B(_) => RecordFormat::B,
            RawSlotRecord::C(_) => RecordFormat::C,
        }
    }

    /// Serializes back into the upstream wire shape
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            RawSlotRecord::A(r) => serde_json::to_value(r),
            RawSlotRecord::B(r) => serde_json::to_value(r),
            RawSlotRecord::C(r) => serde_json::to_value(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_optional_fields() {
        let record = json!({
            "date": "2025-07-20",
            "times": ["09:00"],
            "doctor": { "name": "Dr. Smith", "id": "d1001" },
            "type": "NewPatient"
        });

        let RawSlotRecord::A(a) = RawSlotRecord::from_value(0, &record).unwrap() else {
            panic!("expected format A");
        };
        assert_eq!(a.doctor.id, Some(json!("d1001")));
        assert_eq!(a.appointment_type, Some(json!("NewPatient")));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = json!({
            "appointment_day": "2025-07-22",
            "free_slots": ["08:30"],
            "physician_name": "Dr. Johnson",
            "room": 12
        });
        let typed = RawSlotRecord::from_value(0, &record).unwrap();
        assert_eq!(typed.format(), RecordFormat::C);
    }

    #[test]
    fn test_off_type_unmapped_fields_still_decode() {
        let record = json!({
            "available_on": "2025/07/21",
            "slots": [{ "start": "10:00", "end": 1030 }],
            "provider": "Dr. Lee",
            "category": 3
        });

        let RawSlotRecord::B(b) = RawSlotRecord::from_value(0, &record).unwrap() else {
            panic!("expected format B");
        };
        assert_eq!(b.slots[0].end, Some(json!(1030)));
        assert_eq!(b.category, Some(json!(3)));
    }

    #[test]
    fn test_off_type_mapped_field_is_malformed() {
        let record = json!({ "date": "2025-07-20", "times": ["09:00"], "doctor": { "name": 42 } });
        let err = RawSlotRecord::from_value(2, &record).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedRecord { index: 2, format: RecordFormat::A, .. }));
    }

    #[test]
    fn test_unknown_shape_reports_index() {
        let err = RawSlotRecord::from_value(7, &json!({ "foo": "bar" })).unwrap_err();
        assert_eq!(err, NormalizeError::UnknownFormat { index: 7 });
    }

    #[test]
    fn test_wire_shape_survives_serialization() {
        let record = json!({
            "available_on": "2025/07/21",
            "slots": [{ "start": "10:00", "end": "10:30" }],
            "provider": "Dr. Lee",
            "category": "General"
        });
        let typed = RawSlotRecord::from_value(0, &record).unwrap();
        assert_eq!(typed.to_value().unwrap(), record);
    }
}
