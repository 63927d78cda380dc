//! Structural format detection.
//!
//! Upstream records carry no type tag, so the format is inferred from which
//! signature fields are present. A field counts as present when it is truthy
//! (not null, `false`, `0` or `""`); list fields must be JSON arrays, and an
//! empty array still counts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three shapes the upstream scheduling system emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordFormat {
    /// `date` / `times` / `doctor.name`
    A,
    /// `available_on` / `slots` / `provider`
    B,
    /// `appointment_day` / `free_slots` / `physician_name`
    C,
}

impl RecordFormat {
    /// Detection order; the first matching format wins
    pub const ALL: [RecordFormat; 3] = [RecordFormat::A, RecordFormat::B, RecordFormat::C];

    pub fn label(&self) -> &'static str {
        match self {
            RecordFormat::A => "A",
            RecordFormat::B => "B",
            RecordFormat::C => "C",
        }
    }

    /// Whether `record` carries this format's signature fields
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            RecordFormat::A => {
                field_present(record, "date")
                    && field_is_array(record, "times")
                    && record.get("doctor").and_then(|d| d.get("name")).map_or(false, is_truthy)
            }
            RecordFormat::B => {
                field_present(record, "available_on")
                    && field_is_array(record, "slots")
                    && field_present(record, "provider")
            }
            RecordFormat::C => {
                field_present(record, "appointment_day")
                    && field_is_array(record, "free_slots")
                    && field_present(record, "physician_name")
            }
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First format whose signature `record` satisfies, in A, B, C order
pub fn detect_format(record: &Value) -> Option<RecordFormat> {
    RecordFormat::ALL.into_iter().find(|format| format.matches(record))
}

/// Every format whose signature `record` satisfies. More than one entry
/// means the record is ambiguous.
pub fn matching_formats(record: &Value) -> Vec<RecordFormat> {
    RecordFormat::ALL
        .into_iter()
        .filter(|format| format.matches(record))
        .collect()
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_present(record: &Value, key: &str) -> bool {
    record.get(key).map_or(false, is_truthy)
}

fn field_is_array(record: &Value, key: &str) -> bool {
    record.get(key).map_or(false, Value::is_array)
}
