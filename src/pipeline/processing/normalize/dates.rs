use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CANONICAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("canonical date pattern is valid"));

/// Rewrites an upstream date into `YYYY-MM-DD`.
///
/// This is textual only: every `/` becomes `-`, anything else passes through.
/// No calendar validation happens here, so `2025/13/45` comes out as
/// `2025-13-45`.
pub fn normalize_date(raw: &str) -> String {
    let normalized = if raw.contains('/') {
        raw.replace('/', "-")
    } else {
        raw.to_string()
    };

    if !is_canonical_date(&normalized) {
        debug!(raw, normalized = %normalized, "Date is not in YYYY-MM-DD shape, passing through");
    }
    normalized
}

/// Whether `date` has the `YYYY-MM-DD` shape (digits only, no range checks)
pub fn is_canonical_date(date: &str) -> bool {
    CANONICAL_DATE.is_match(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slashes_become_dashes() {
        assert_eq!(normalize_date("2025/07/21"), "2025-07-21");
    }

    #[test]
    fn test_dashed_dates_pass_through() {
        assert_eq!(normalize_date("2025-07-20"), "2025-07-20");
    }

    #[test]
    fn test_other_shapes_pass_through_unchanged() {
        assert_eq!(normalize_date("20.07.2025"), "20.07.2025");
        assert_eq!(normalize_date("July 20"), "July 20");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(normalize_date("2025/13/45"), "2025-13-45");
        assert!(is_canonical_date("2025-13-45"));
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(normalize_date("2025/07-21"), "2025-07-21");
        assert_eq!(normalize_date("07/21/2025"), "07-21-2025");
        assert!(!is_canonical_date("07-21-2025"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["2025/07/21", "2025-07-20", "a/b/c", "//", "20.07.2025", "", "2025//07"] {
            let once = normalize_date(input);
            assert_eq!(normalize_date(&once), once, "not idempotent for {input:?}");
        }
    }
}
