use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Epoch values above this are taken to be milliseconds rather than seconds.
const EPOCH_MILLIS_FLOOR: f64 = 1e11;

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses `applicationOpen` values from the formats found in recruitment
/// datasets.
pub struct DateParser;

impl DateParser {
    /// Attempt to parse a [`serde_json::Value`] into a wall-clock date-time.
    ///
    /// Handles:
    /// * `null`       → `None`
    /// * JSON string  → RFC 3339 / ISO 8601 (with or without offset, `Z`
    ///   suffix included), RFC 2822, or common date and date-time patterns.
    ///   Offsets are kept as local time rather than shifted to UTC.
    /// * JSON number  → Unix timestamp in seconds, or milliseconds when large.
    pub fn parse(value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::String(s) => Self::parse_str(s.trim()),
            Value::Number(n) => {
                let raw = n.as_f64()?;
                let secs = if raw.abs() > EPOCH_MILLIS_FLOOR {
                    raw / 1000.0
                } else {
                    raw
                };
                let whole = secs.trunc() as i64;
                let nanos = (secs.fract().abs() * 1_000_000_000.0).round() as u32;
                DateTime::from_timestamp(whole, nanos.min(999_999_999)).map(|dt| dt.naive_utc())
            }
            _ => None,
        }
    }

    /// Parse a date string; see [`DateParser::parse`].
    pub fn parse_str(s: &str) -> Option<NaiveDateTime> {
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.naive_local());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f%z",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%d/%m/%Y %H:%M:%S",
            "%m/%d/%Y %H:%M:%S",
        ];

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.naive_local());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d %B %Y", "%d %b %Y"];

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        tracing::trace!(value = s, "unrecognised date format");
        None
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
