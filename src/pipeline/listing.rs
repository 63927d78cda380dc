//! Filtering and pagination over normalized slots.
//!
//! Query values arrive as raw strings and are read leniently: a leading
//! integer is used when present (`"5abc"` reads as 5), anything else falls
//! back to the default.

use serde::Deserialize;
use tracing::debug;

use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::pipeline::processing::normalize::UnifiedSlot;
use crate::types::Pagination;

/// Query parameters of the available-slots listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotQuery {
    /// Case-insensitive substring of the provider name
    pub provider: Option<String>,
    /// Exact `YYYY-MM-DD` match
    pub date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPage {
    pub slots: Vec<UnifiedSlot>,
    pub pagination: Pagination,
}

/// Filters then paginates `slots`, preserving their order
pub fn list_slots(slots: Vec<UnifiedSlot>, query: &SlotQuery) -> SlotPage {
    let filtered = filter_slots(slots, query.provider.as_deref(), query.date.as_deref());
    let page = resolve_page(query.page.as_deref());
    let limit = resolve_limit(query.limit.as_deref());
    paginate(filtered, page, limit)
}

/// Applies the provider filter, then the date filter. Empty filter values are ignored.
pub fn filter_slots(slots: Vec<UnifiedSlot>, provider: Option<&str>, date: Option<&str>) -> Vec<UnifiedSlot> {
    let mut filtered = slots;

    if let Some(provider) = provider.filter(|p| !p.is_empty()) {
        let needle = provider.to_lowercase();
        filtered.retain(|slot| slot.provider.to_lowercase().contains(&needle));
        debug!("Filtered by provider '{}': {} slots", provider, filtered.len());
    }

    if let Some(date) = date.filter(|d| !d.is_empty()) {
        filtered.retain(|slot| slot.date == date);
        debug!("Filtered by date '{}': {} slots", date, filtered.len());
    }

    filtered
}

/// Page number, at least 1
pub fn resolve_page(raw: Option<&str>) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(page) => page.max(1) as usize,
        None => DEFAULT_PAGE,
    }
}

/// Page size, clamped to `1..=50`
pub fn resolve_limit(raw: Option<&str>) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(limit) => limit.clamp(1, MAX_LIMIT as i64) as usize,
        None => DEFAULT_LIMIT,
    }
}

pub fn paginate(slots: Vec<UnifiedSlot>, page: usize, limit: usize) -> SlotPage {
    let total = slots.len();
    let pages = total.div_ceil(limit);
    let start = page.saturating_sub(1).saturating_mul(limit);

    let slots = slots.into_iter().skip(start).take(limit).collect();

    SlotPage {
        slots,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
    }
}

/// Reads an optionally signed integer prefix, ignoring surrounding whitespace
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }

    // Saturate absurdly long inputs instead of failing
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}
