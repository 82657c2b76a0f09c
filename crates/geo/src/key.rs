//! Position keys: coordinates rounded to a fixed number of decimals.

use crate::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision of map marker keys (≈11 m).
pub const MARKER_KEY_DECIMALS: u32 = 4;

/// Precision of favorite destination keys (≈1.1 m).
pub const FAVORITE_KEY_DECIMALS: u32 = 5;

/// Stable identity for "the same place", formatted as `"lat,lng"`.
///
/// Two coordinates get equal keys iff they format identically at the chosen
/// precision. Negative zero is folded into zero so `-0.00001` and `0.00001`
/// share a key at 4 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(String);

impl PositionKey {
    /// Key for a valid coordinate, `None` otherwise.
    pub fn new(c: &Coordinate, decimals: u32) -> Option<Self> {
        if !c.is_valid() {
            return None;
        }
        let precision = decimals as usize;
        Some(Self(format!(
            "{},{}",
            fixed(c.lat, precision),
            fixed(c.lng, precision)
        )))
    }

    /// Marker key at [`MARKER_KEY_DECIMALS`].
    pub fn marker(c: &Coordinate) -> Option<Self> {
        Self::new(c, MARKER_KEY_DECIMALS)
    }

    /// Favorite key at [`FAVORITE_KEY_DECIMALS`].
    pub fn favorite(c: &Coordinate) -> Option<Self> {
        Self::new(c, FAVORITE_KEY_DECIMALS)
    }

    /// The formatted key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the formatted string.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn fixed(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$}");
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => s,
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PositionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_key_format() {
        let key = PositionKey::favorite(&Coordinate::new(49.2827, -123.1207)).unwrap();
        assert_eq!(key.as_str(), "49.28270,-123.12070");
    }

    #[test]
    fn test_marker_key_rounds() {
        let a = PositionKey::marker(&Coordinate::new(49.28271, -123.12069)).unwrap();
        let b = PositionKey::marker(&Coordinate::new(49.28268, -123.12072)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "49.2827,-123.1207");
    }

    #[test]
    fn test_negative_zero_folded() {
        let a = PositionKey::marker(&Coordinate::new(-0.00001, 0.00001)).unwrap();
        let b = PositionKey::marker(&Coordinate::new(0.00001, -0.00001)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0.0000,0.0000");
    }

    #[test]
    fn test_invalid_has_no_key() {
        assert!(PositionKey::marker(&Coordinate::new(f64::NAN, 0.0)).is_none());
        assert!(PositionKey::favorite(&Coordinate::new(0.0, 200.0)).is_none());
    }
}
