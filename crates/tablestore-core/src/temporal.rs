//! Timestamp parsing for DateTime properties and literals
//!
//! Stored DateTime values and `datetime'...'` literals are both ISO 8601
//! strings. Comparisons happen at millisecond resolution, so two timestamps
//! that differ only below the millisecond are equal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a timestamp string.
///
/// Accepts RFC 3339 (with an offset or `Z`), a zone-less date-time which is
/// taken to be UTC, or a bare date which is taken to be UTC midnight.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a timestamp and truncate it to milliseconds since the Unix epoch
pub fn timestamp_millis(value: &str) -> Option<i64> {
    parse_timestamp(value).map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(timestamp_millis("1970-01-01T00:00:00Z"), Some(0));
        assert_eq!(timestamp_millis("1970-01-01T00:00:01.500Z"), Some(1500));
        assert_eq!(timestamp_millis("1970-01-01T01:00:00+01:00"), Some(0));
    }

    #[test]
    fn test_parse_zoneless_and_date() {
        assert_eq!(timestamp_millis("1970-01-01T00:00:02"), Some(2000));
        assert_eq!(timestamp_millis("1970-01-01T00:01"), Some(60_000));
        assert_eq!(timestamp_millis("1970-01-02"), Some(86_400_000));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2020-13-01T00:00:00Z"), None);
    }

    #[test]
    fn test_millisecond_truncation() {
        assert_eq!(
            timestamp_millis("2023-01-01T00:00:00.000123Z"),
            timestamp_millis("2023-01-01T00:00:00.000000Z")
        );
        assert_ne!(
            timestamp_millis("2023-01-01T00:00:00.000123Z"),
            timestamp_millis("2023-01-01T00:00:00.001000Z")
        );
    }

    proptest! {
        #[test]
        fn prop_sub_millisecond_digits_are_ignored(millis in 0u32..1000, micros in 0u32..1000) {
            let base = format!("2021-06-15T12:30:45.{:03}Z", millis);
            let precise = format!("2021-06-15T12:30:45.{:03}{:03}Z", millis, micros);
            prop_assert_eq!(timestamp_millis(&base), timestamp_millis(&precise));
        }
    }
}
