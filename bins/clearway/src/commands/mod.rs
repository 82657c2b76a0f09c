//! CLI command implementations

pub mod distance;
pub mod geocode;
pub mod history;
pub mod key;
pub mod nearby;
pub mod route;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clearway_geo::Coordinate;
use clearway_traffic::{Clock, FixedClock, SystemClock};
use serde::Serialize;
use std::sync::Arc;

/// Parse a `"lat,lng"` argument
pub fn parse_point(input: &str) -> Result<Coordinate> {
    input
        .parse::<Coordinate>()
        .with_context(|| format!("Invalid point '{input}', expected \"lat,lng\""))
}

/// Wall clock, or a fixed instant for replaying old exports
pub fn clock_at(at: Option<DateTime<Utc>>) -> Arc<dyn Clock> {
    match at {
        Some(at) => Arc::new(FixedClock::new(at.timestamp_millis())),
        None => Arc::new(SystemClock),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = parse_point(" 49.2827, -123.1207 ").unwrap();
        assert_eq!(point, Coordinate::new(49.2827, -123.1207));
        assert!(parse_point("91,0").is_err());
        assert!(parse_point("vancouver").is_err());
    }

    #[test]
    fn test_clock_at_fixed() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(clock_at(Some(at)).now_ms(), 1_709_294_400_000);
    }
}
