use serde_json::Value;

use super::UnifiedSlot;

const REQUIRED_FIELDS: [&str; 3] = ["date", "start_time", "provider"];

/// Post-condition check over normalized output: every slot carries a
/// non-empty date, start time and provider. An empty batch is valid.
pub fn validate_normalized_data(slots: &[UnifiedSlot]) -> bool {
    slots
        .iter()
        .all(|slot| !slot.date.is_empty() && !slot.start_time.is_empty() && !slot.provider.is_empty())
}

/// Same check over untyped JSON, e.g. a response body
pub fn validate_normalized_json(value: &Value) -> bool {
    let Some(slots) = value.as_array() else {
        return false;
    };

    slots.iter().all(|slot| {
        REQUIRED_FIELDS.iter().all(|field| {
            slot.get(*field)
                .and_then(Value::as_str)
                .map_or(false, |s| !s.is_empty())
        })
    })
}
