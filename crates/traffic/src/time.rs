//! Timestamp normalisation and clocks.
//!
//! Reports arrive with timestamps in whatever shape the writer used: epoch
//! seconds, epoch millis, ISO strings, or the document store's own timestamp
//! objects. Everything is folded into epoch milliseconds here.
//!
//! # Seconds vs. millis
//!
//! A bare number below [`SECONDS_MILLIS_THRESHOLD`] (1e12) is read as epoch
//! **seconds**, anything at or above it as epoch **millis**. 1e12 ms is
//! September 2001, so every millis timestamp written since then is
//! unambiguous, while a seconds timestamp only reaches 1e12 in the year
//! 33658. Changing the threshold changes how stored records are read.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Numbers below this are epoch seconds, at or above it epoch millis.
pub const SECONDS_MILLIS_THRESHOLD: f64 = 1e12;

/// Naive formats accepted for date strings without an offset, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A typed value that can be converted to a point in time.
pub trait DateLike {
    /// Epoch milliseconds, or `None` if the value is not a valid instant.
    fn to_epoch_millis(&self) -> Option<i64>;
}

impl<Tz: TimeZone> DateLike for DateTime<Tz> {
    fn to_epoch_millis(&self) -> Option<i64> {
        Some(self.timestamp_millis())
    }
}

impl DateLike for NaiveDateTime {
    fn to_epoch_millis(&self) -> Option<i64> {
        Some(self.and_utc().timestamp_millis())
    }
}

impl DateLike for SystemTime {
    fn to_epoch_millis(&self) -> Option<i64> {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok(),
            Err(before) => i64::try_from(before.duration().as_millis()).ok().map(|ms| -ms),
        }
    }
}

/// Normalises a typed date value.
pub fn normalize_date<D: DateLike + ?Sized>(date: &D) -> Option<i64> {
    date.to_epoch_millis()
}

/// Normalises a loosely-typed timestamp into epoch milliseconds.
///
/// Accepted shapes:
/// - `{"timestampValue": "<rfc3339>"}` (the document store's REST form)
/// - `{"seconds": s, "nanoseconds": n}` or `{"_seconds": s, "_nanoseconds": n}`
///   → `s * 1000 + floor(n / 1e6)`
/// - a number, disambiguated by [`SECONDS_MILLIS_THRESHOLD`]
/// - a date string (RFC 3339, RFC 2822, or naive `YYYY-MM-DD[ HH:MM[:SS]]` as UTC)
///
/// Falsy input (`null`, `false`, `0`, `""`), bare digit strings such as
/// `"1709294400"`, and anything unparseable yield `None`. Never panics.
pub fn normalize_timestamp(input: &Value) -> Option<i64> {
    match input {
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
        Value::Number(n) => n.as_f64().and_then(from_number),
        Value::String(s) => parse_date_str(s),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("timestampValue") {
                return parse_date_str(s);
            }
            let seconds = map.get("seconds").or_else(|| map.get("_seconds"))?.as_f64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            finite_millis(seconds * 1000.0 + (nanos / 1e6).floor())
        }
    }
}

fn from_number(n: f64) -> Option<i64> {
    if n == 0.0 {
        return None;
    }
    let millis = if n < SECONDS_MILLIS_THRESHOLD { n * 1000.0 } else { n };
    finite_millis(millis)
}

#[allow(clippy::cast_possible_truncation)]
fn finite_millis(ms: f64) -> Option<i64> {
    // i64 holds about ±9.22e18; stay clear of the saturating cast
    (ms.is_finite() && ms.abs() < 9.0e18).then(|| ms.floor() as i64)
}

fn parse_date_str(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Relative age label: `"Just now"`, `"12 min ago"`, `"3 h ago"`, `"2 d ago"`.
///
/// Missing timestamps give an empty string; future timestamps read as "Just now".
pub fn time_ago(created_at_ms: Option<i64>, now_ms: i64) -> String {
    let Some(created) = created_at_ms else {
        return String::new();
    };
    let minutes = now_ms.saturating_sub(created).max(0) / 60_000;
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} h ago");
    }
    format!("{} d ago", hours / 24)
}

/// Source of "now" for age calculations.
pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    /// Clock frozen at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    /// Moves the clock to `now_ms`.
    pub fn set(&self, now_ms: i64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
