// src/core/dates.rs
//! Timestamp parsing and calendar-date helpers.
//!
//! Remote timestamps come in a few shapes (`2025-01-08T14:02:10.000Z`,
//! `2025-01-08T14:02:10+0000`, naive `2025-01-08T14:02:10`, or a bare date).
//! Aware values keep their offset; naive values are placed in a zone chosen
//! by the caller (UTC for remote data, the configured zone for `--now`).

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

enum Parsed {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

fn parse_any(s: &str) -> Option<Parsed> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Parsed::Aware(dt));
    }
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(Parsed::Aware(dt));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Parsed::Naive(dt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| Parsed::Naive(d.and_time(NaiveTime::MIN)))
}

/// Parse a timestamp; naive values are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    match parse_any(s) {
        Some(Parsed::Aware(dt)) => Ok(dt),
        Some(Parsed::Naive(naive)) => Ok(Utc.from_utc_datetime(&naive).fixed_offset()),
        None => Err(format!("unrecognized timestamp `{}`", s.trim())),
    }
}

/// Parse a timestamp; naive values are taken as local time in `tz`.
pub fn parse_timestamp_in(s: &str, tz: Tz) -> Result<DateTime<FixedOffset>, String> {
    match parse_any(s) {
        Some(Parsed::Aware(dt)) => Ok(dt),
        Some(Parsed::Naive(naive)) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| format!("`{}` does not exist in {tz}", s.trim())),
        None => Err(format!("unrecognized timestamp `{}`", s.trim())),
    }
}

/// "Now" in `tz`, as a fixed-offset timestamp.
pub fn now_in(tz: Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&tz).fixed_offset()
}

/// Calendar date of `ts` as seen in `tz`.
pub fn local_date(ts: &DateTime<FixedOffset>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Wall-clock time of `ts` in `tz`, offset dropped.
pub fn local_naive(ts: &DateTime<FixedOffset>, tz: Tz) -> NaiveDateTime {
    ts.with_timezone(&tz).naive_local()
}

/// Leading `YYYY-MM-DD` of a cell such as `2024-11-02T00:00:00.000`.
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
