//! Timestamp formatting
//!
//! The backend sends either RFC 3339 or naive ISO timestamps. Naive values
//! are shown as-is, offset values are shifted to local time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Date and time; unparsable input is returned unchanged
pub fn format_timestamp(raw: &str) -> String {
    parse(raw)
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Date only
pub fn format_date(raw: &str) -> String {
    parse(raw)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Whether `raw` is a calendar date in `YYYY-MM-DD` form
pub fn is_calendar_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_timestamps_keep_wall_time() {
        assert_eq!(
            format_timestamp("2024-05-01T10:15:00.123456"),
            "2024-05-01 10:15:00"
        );
        assert_eq!(format_date("2024-05-01T10:15:00"), "2024-05-01");
    }

    #[test]
    fn test_offset_timestamps_parse() {
        let formatted = format_timestamp("2024-05-01T10:15:00+00:00");
        assert_eq!(formatted.len(), "2024-05-01 10:15:00".len());
    }

    #[test]
    fn test_unparsable_is_verbatim() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_calendar_date() {
        assert!(is_calendar_date("2024-02-29"));
        assert!(!is_calendar_date("2023-02-29"));
        assert!(!is_calendar_date("02/01/2024"));
    }
}
