//! Timestamp parsing shared by trip records and the item normalizer.
//!
//! Trip data arrives with three kinds of time values:
//! - UTC instants (`2025-11-13T10:00:00.000Z`), sometimes without an offset
//!   or reduced to a bare date
//! - trip calendar dates (`2025-11-13`)
//! - airport-local strings with an embedded offset (`2025-11-13 14:00+04:00`)

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};

const LOCAL_FORMATS_WITH_OFFSET: &[&str] = &[
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%d %H:%M %:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a UTC-bearing timestamp.
///
/// Accepts RFC 3339, a naive ISO datetime (read as UTC) or a bare date
/// (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a calendar date.
///
/// Only the leading `YYYY-MM-DD` is read, so `2025-11-13T00:00:00.000Z`
/// yields 2025-11-13 without any offset arithmetic.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Parse a UTC offset such as `+04:00`, `-0530` or `Z`.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// A wall-clock reading taken from an airport-local time string.
///
/// The date and time are those *encoded* in the string; the offset is kept
/// for reference but never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalStamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub offset: Option<FixedOffset>,
}

impl LocalStamp {
    /// Parse strings like `2025-11-13 14:00+04:00`.
    ///
    /// Falls back to a date-only reading of the text before the first space
    /// (or `T`) when the full string is not a recognized datetime.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in LOCAL_FORMATS_WITH_OFFSET {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(Self::from_offset_datetime(dt));
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::from_offset_datetime(dt));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self {
                    date: naive.date(),
                    time: Some(naive.time()),
                    offset: None,
                });
            }
        }

        let date_part = s.split([' ', 'T']).next()?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
        Some(Self {
            date,
            time: None,
            offset: None,
        })
    }

    fn from_offset_datetime(dt: DateTime<FixedOffset>) -> Self {
        let wall = dt.naive_local();
        Self {
            date: wall.date(),
            time: Some(wall.time()),
            offset: Some(*dt.offset()),
        }
    }
}

/// Format a timestamp the way trip records store it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for required UTC timestamps in trip records.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("unparseable timestamp {:?}", raw)))
    }
}

/// Serde adapter for optional UTC timestamps. Empty strings read as `None`.
pub mod timestamp_opt {
    use chrono::{DateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_str(&super::format_timestamp(ts)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unparseable timestamp {:?}", value))),
        }
    }
}

/// Serde adapter for calendar dates, tolerant of full ISO timestamps.
pub mod date {
    use chrono::NaiveDate;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("unparseable date {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_variants() {
        let rfc = parse_timestamp("2025-11-13T10:00:00.000Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let shifted = parse_timestamp("2025-11-13T12:00:00+02:00").unwrap();
        assert_eq!(shifted, rfc);

        let naive = parse_timestamp("2025-11-13T10:00:00").unwrap();
        assert_eq!(naive, rfc);

        let date_only = parse_timestamp("2025-11-13").unwrap();
        assert_eq!(date_only.day(), 13);
        assert_eq!(date_only.hour(), 0);

        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_date_ignores_time_portion() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 13).unwrap();
        assert_eq!(parse_date("2025-11-13"), Some(expected));
        assert_eq!(parse_date("2025-11-13T23:30:00.000Z"), Some(expected));
        assert_eq!(parse_date("13/11/2025"), None);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+04:00").unwrap().local_minus_utc(), 4 * 3600);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("04:00").is_none());
        assert!(parse_offset("+25:00").is_none());
        assert!(parse_offset("+4").is_none());
    }

    #[test]
    fn test_local_stamp_keeps_encoded_date() {
        let stamp = LocalStamp::parse("2025-11-13 23:30+04:00").unwrap();
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2025, 11, 13).unwrap());
        assert_eq!(stamp.time, NaiveTime::from_hms_opt(23, 30, 0));
        assert_eq!(stamp.offset.unwrap().local_minus_utc(), 4 * 3600);
    }

    #[test]
    fn test_local_stamp_negative_offset_and_seconds() {
        let stamp = LocalStamp::parse("2025-11-14 01:15:00-05:00").unwrap();
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2025, 11, 14).unwrap());
        assert_eq!(stamp.time, NaiveTime::from_hms_opt(1, 15, 0));
    }

    #[test]
    fn test_local_stamp_date_only_fallback() {
        let stamp = LocalStamp::parse("2025-11-13 around noon").unwrap();
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2025, 11, 13).unwrap());
        assert!(stamp.time.is_none());

        assert!(LocalStamp::parse("soon").is_none());
        assert!(LocalStamp::parse("   ").is_none());
    }

    #[test]
    fn test_format_timestamp_matches_record_encoding() {
        let ts = parse_timestamp("2025-11-13T10:00:00Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-11-13T10:00:00.000Z");
    }
}
