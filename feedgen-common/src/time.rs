//! Timestamp utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Current Unix epoch time in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a source timestamp into UTC.
///
/// Accepts RFC 3339 (`2024-05-01T12:30:00.000Z`, any offset), a zone-less
/// date-time (taken as UTC) and a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// UTC calendar date (`YYYY-MM-DD`) of a source timestamp string
pub fn release_date_from_text(text: &str) -> Option<String> {
    parse_timestamp(text).map(|dt| format_date(&dt))
}

/// UTC calendar date (`YYYY-MM-DD`) of a Unix epoch in milliseconds
pub fn release_date_from_millis(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| format_date(&dt))
}

fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_release_date_uses_utc_calendar_day() {
        assert_eq!(
            release_date_from_text("2024-05-01T12:30:00.000Z").as_deref(),
            Some("2024-05-01")
        );
        // 23:30 at -05:00 is already the next day in UTC
        assert_eq!(
            release_date_from_text("2024-05-01T23:30:00-05:00").as_deref(),
            Some("2024-05-02")
        );
    }

    #[test]
    fn test_release_date_lenient_formats() {
        assert_eq!(
            release_date_from_text("2023-12-31T08:00:00").as_deref(),
            Some("2023-12-31")
        );
        assert_eq!(release_date_from_text("2023-12-31").as_deref(), Some("2023-12-31"));
    }

    #[test]
    fn test_release_date_rejects_garbage() {
        assert_eq!(release_date_from_text(""), None);
        assert_eq!(release_date_from_text("last tuesday"), None);
    }

    #[test]
    fn test_release_date_from_millis() {
        // 2024-02-29T23:59:59.999Z
        assert_eq!(
            release_date_from_millis(1_709_251_199_999).as_deref(),
            Some("2024-02-29")
        );
    }
}
