//! Date normalizers for heterogeneous source formats.
//!
//! Sources disagree wildly on date representation: ISO 8601 timestamps
//! with or without a trailing `Z`, bare `YYYY-MM-DD` dates, and compact
//! `YYYYMMDD` digit strings. Everything is normalized to `YYYY-MM-DD`.
//!
//! Parse failures never propagate as errors. A value that cannot be
//! parsed is passed through unchanged so the tab keeps *a* value instead
//! of losing the field.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Sentinel for postings with no closing date (rolling recruitment).
/// Treated as an opaque domain string, sorted after every real date.
pub const ROLLING: &str = "상시채용";

/// Normalize an ISO 8601-ish timestamp to `YYYY-MM-DD`.
///
/// Absent or empty input returns `default`. A trailing `Z` is read as
/// UTC offset zero. Unparseable input is returned unchanged.
pub fn normalize_iso(raw: Option<&str>, default: &str) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return default.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    // Offset-less timestamps, with either the T or a space separator
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

/// Normalize a compact `YYYYMMDD` date, defaulting to [`ROLLING`].
pub fn normalize_compact(raw: Option<&str>) -> String {
    normalize_compact_or(raw, ROLLING)
}

/// Normalize a compact `YYYYMMDD` date with an explicit default.
pub fn normalize_compact_or(raw: Option<&str>, default: &str) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return default.to_string();
    };

    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_with_z_suffix() {
        assert_eq!(
            normalize_iso(Some("2025-01-15T09:30:00Z"), ""),
            "2025-01-15"
        );
    }

    #[test]
    fn test_iso_with_offset() {
        assert_eq!(
            normalize_iso(Some("2025-03-01T00:00:00+09:00"), ""),
            "2025-03-01"
        );
    }

    #[test]
    fn test_iso_without_offset() {
        assert_eq!(normalize_iso(Some("2025-01-15T09:30:00"), ""), "2025-01-15");
        assert_eq!(normalize_iso(Some("2025-01-15 09:30:00"), ""), "2025-01-15");
    }

    #[test]
    fn test_iso_bare_date() {
        assert_eq!(normalize_iso(Some("2025-01-15"), ""), "2025-01-15");
    }

    #[test]
    fn test_iso_absent_returns_default() {
        assert_eq!(normalize_iso(None, ROLLING), ROLLING);
        assert_eq!(normalize_iso(Some(""), ROLLING), ROLLING);
    }

    #[test]
    fn test_iso_parse_failure_passes_through() {
        assert_eq!(normalize_iso(Some("not-a-date"), ""), "not-a-date");
    }

    #[test]
    fn test_compact_success() {
        assert_eq!(normalize_compact(Some("20250115")), "2025-01-15");
    }

    #[test]
    fn test_compact_absent_returns_rolling_sentinel() {
        assert_eq!(normalize_compact(None), ROLLING);
        assert_eq!(normalize_compact(Some("")), ROLLING);
    }

    #[test]
    fn test_compact_parse_failure_passes_through() {
        assert_eq!(normalize_compact(Some("2025-01")), "2025-01");
        assert_eq!(normalize_compact(Some("99999999")), "99999999");
    }

    #[test]
    fn test_compact_explicit_default() {
        assert_eq!(normalize_compact_or(None, ""), "");
    }
}
