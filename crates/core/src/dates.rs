//! Date normalization for spreadsheet input and JSON payloads.
//!
//! Sheets carry milestone dates as `MM/DD/YY` or `MM/DD/YYYY`, with `-`
//! marking "no date". Anything that does not parse into a real calendar
//! date degrades to `None`; nothing in this module returns an error for
//! malformed input coming from a sheet.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use crate::types::Timestamp;

/// Cell value used by the import template for "no date".
pub const EMPTY_DATE_SENTINEL: &str = "-";

/// Convert a loosely formatted `MM/DD/YY` or `MM/DD/YYYY` string into a UTC
/// midnight timestamp.
///
/// Returns `None` for missing input, the `-` sentinel, anything that is not
/// exactly three `/`-separated numeric parts, and impossible calendar dates.
/// One- and two-digit years are read as `2000 + year`.
pub fn normalize_date(raw: Option<&str>) -> Option<Timestamp> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == EMPTY_DATE_SENTINEL {
        return None;
    }

    let mut parts = raw.split('/');
    let month = parts.next()?;
    let day = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let month: u32 = numeric_component(month)?;
    let day: u32 = numeric_component(day)?;
    let year_digits = year.trim();
    let mut year: i32 = numeric_component(year_digits)?;
    if year_digits.len() <= 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Parse a date part made only of ASCII digits.
fn numeric_component<T: std::str::FromStr>(part: &str) -> Option<T> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Render a timestamp the way it is stored and reported (`2024-03-01T00:00:00.000Z`).
pub fn format_iso(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde helper for optional date fields in write payloads.
///
/// Accepts `null`, an empty string (treated as absent), an RFC 3339
/// timestamp, or a bare `YYYY-MM-DD` date.
pub fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ymd(ts: Timestamp) -> (i32, u32, u32) {
        (ts.year(), ts.month(), ts.day())
    }

    #[test]
    fn four_digit_year() {
        let ts = normalize_date(Some("03/15/2024")).unwrap();
        assert_eq!(ymd(ts), (2024, 3, 15));
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn two_digit_year_is_2000_based() {
        let ts = normalize_date(Some("1/5/24")).unwrap();
        assert_eq!(ymd(ts), (2024, 1, 5));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let ts = normalize_date(Some("  12/31/2023 ")).unwrap();
        assert_eq!(ymd(ts), (2023, 12, 31));
    }

    #[test]
    fn leap_day_is_accepted() {
        assert!(normalize_date(Some("02/29/2024")).is_some());
        assert!(normalize_date(Some("02/29/2023")).is_none());
    }

    #[test]
    fn missing_and_sentinel_are_none() {
        assert!(normalize_date(None).is_none());
        assert!(normalize_date(Some("")).is_none());
        assert!(normalize_date(Some("   ")).is_none());
        assert!(normalize_date(Some("-")).is_none());
    }

    #[test]
    fn wrong_separator_is_none() {
        assert!(normalize_date(Some("03-15-2024")).is_none());
        assert!(normalize_date(Some("2024.03.15")).is_none());
    }

    #[test]
    fn missing_component_is_none() {
        assert!(normalize_date(Some("03/15")).is_none());
        assert!(normalize_date(Some("03//2024")).is_none());
        assert!(normalize_date(Some("03/15/2024/1")).is_none());
    }

    #[test]
    fn non_numeric_component_is_none() {
        assert!(normalize_date(Some("Mar/15/2024")).is_none());
        assert!(normalize_date(Some("03/1x/2024")).is_none());
        assert!(normalize_date(Some("03/15/-24")).is_none());
    }

    #[test]
    fn impossible_calendar_dates_are_none() {
        assert!(normalize_date(Some("13/01/2024")).is_none());
        assert!(normalize_date(Some("01/32/2024")).is_none());
        assert!(normalize_date(Some("00/10/2024")).is_none());
        assert!(normalize_date(Some("04/31/24")).is_none());
    }

    #[test]
    fn iso_format_has_millis_and_z() {
        let ts = normalize_date(Some("07/04/2025")).unwrap();
        assert_eq!(format_iso(&ts), "2025-07-04T00:00:00.000Z");
    }

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        at: Option<Timestamp>,
    }

    #[test]
    fn payload_empty_string_is_absent() {
        let p: Payload = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(p.at.is_none());
        let p: Payload = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(p.at.is_none());
        let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.at.is_none());
    }

    #[test]
    fn payload_accepts_rfc3339_and_plain_dates() {
        let p: Payload = serde_json::from_str(r#"{"at": "2025-01-10T00:00:00.000Z"}"#).unwrap();
        assert_eq!(ymd(p.at.unwrap()), (2025, 1, 10));
        let p: Payload = serde_json::from_str(r#"{"at": "2025-05-15"}"#).unwrap();
        assert_eq!(ymd(p.at.unwrap()), (2025, 5, 15));
    }

    #[test]
    fn payload_rejects_garbage() {
        let result: Result<Payload, _> = serde_json::from_str(r#"{"at": "next tuesday"}"#);
        assert!(result.is_err());
    }
}
