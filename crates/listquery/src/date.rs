//! Date parsing for the date-range stage.
//!
//! Accepts the shapes list endpoints commonly receive: RFC 3339, ISO
//! datetimes with minute precision and a `Z` or numeric offset, bare
//! `YYYY-MM-DD` and `YYYY/MM/DD` dates, `YYYY-MM` and `YYYY` prefixes, local
//! datetimes without an offset, and RFC 2822. Everything without an explicit
//! offset is UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::value::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

// Offsets RFC 3339 rejects: no seconds, no colon, or a space separator
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a date string into milliseconds since the Unix epoch.
pub fn parse_date_millis(input: &str) -> Option<i64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(midnight_utc(date));
        }
    }
    let zulu = s.strip_suffix('Z').or_else(|| s.strip_suffix('z'));
    if let Some(millis) = zulu.and_then(parse_naive_datetime) {
        return Some(millis);
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.timestamp_millis());
        }
    }
    if let Some(millis) = parse_naive_datetime(s) {
        return Some(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    parse_partial_date(s)
}

fn parse_naive_datetime(s: &str) -> Option<i64> {
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// `YYYY-MM` or `YYYY`, read as the first instant of that month or year.
fn parse_partial_date(s: &str) -> Option<i64> {
    let mut parts = s.splitn(2, '-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(midnight_utc)
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// Reads a record's date field as milliseconds.
///
/// Strings are parsed, timestamps pass through and finite numbers are taken
/// as epoch millis. Everything else has no date.
pub fn value_millis(value: &Value<'_>) -> Option<i64> {
    match value {
        Value::String(s) => parse_date_millis(s),
        Value::Timestamp(t) => Some(t.as_millis()),
        Value::Number(n) => n.truncate(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    const JAN_10_2024: i64 = 1_704_844_800_000;

    #[test]
    fn bare_dates_are_utc_midnight() {
        assert_eq!(parse_date_millis("2024-01-10"), Some(JAN_10_2024));
        assert_eq!(parse_date_millis(" 2024-01-10 "), Some(JAN_10_2024));
    }

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            parse_date_millis("2024-01-10T01:00:00+01:00"),
            Some(JAN_10_2024)
        );
        assert_eq!(
            parse_date_millis("2024-01-10T00:00:00.250Z"),
            Some(JAN_10_2024 + 250)
        );
    }

    #[test]
    fn naive_datetimes() {
        assert_eq!(
            parse_date_millis("2024-01-10T00:01"),
            Some(JAN_10_2024 + 60_000)
        );
        assert_eq!(
            parse_date_millis("2024-01-10 00:00:01"),
            Some(JAN_10_2024 + 1000)
        );
    }

    #[test]
    fn minute_precision_with_zone() {
        let jan_20 = JAN_10_2024 + 10 * 86_400_000;
        let hour = 3_600_000;

        assert_eq!(parse_date_millis("2024-01-20T10:00Z"), Some(jan_20 + 10 * hour));
        assert_eq!(parse_date_millis("2024-01-20T10:00+07:00"), Some(jan_20 + 3 * hour));
        assert_eq!(parse_date_millis("2024-01-20T10:00-0200"), Some(jan_20 + 12 * hour));
        assert_eq!(
            parse_date_millis("2024-01-20T10:00:30+0700"),
            Some(jan_20 + 3 * hour + 30_000)
        );
        assert_eq!(parse_date_millis("2024-01-20 10:00+01:00"), Some(jan_20 + 9 * hour));
    }

    #[test]
    fn slash_dates() {
        let jan_20 = JAN_10_2024 + 10 * 86_400_000;

        assert_eq!(parse_date_millis("2024/01/20"), Some(jan_20));
        assert_eq!(parse_date_millis("2024/01/20 06:30"), Some(jan_20 + 23_400_000));
        assert_eq!(parse_date_millis("2024/13/01"), None);
    }

    #[test]
    fn trailing_z_needs_a_time() {
        assert_eq!(parse_date_millis("2024-01-20Z"), None);
        assert_eq!(parse_date_millis("Z"), None);
    }

    #[test]
    fn partial_dates() {
        assert_eq!(parse_date_millis("2024"), Some(1_704_067_200_000));
        assert_eq!(parse_date_millis("2024-01"), Some(1_704_067_200_000));
        assert_eq!(parse_date_millis("2024-13"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date_millis(""), None);
        assert_eq!(parse_date_millis("yesterday"), None);
        assert_eq!(parse_date_millis("2024-02-30"), None);
    }

    #[test]
    fn value_millis_dispatch() {
        assert_eq!(value_millis(&Value::String("2024-01-10")), Some(JAN_10_2024));
        assert_eq!(value_millis(&Value::Timestamp(Timestamp(5))), Some(5));
        assert_eq!(value_millis(&Value::Number(Number::I64(9))), Some(9));
        assert_eq!(value_millis(&Value::Null), None);
        assert_eq!(value_millis(&Value::Bool(true)), None);
    }
}
