//! Geospatial primitives for the ClearWay map engine.
//!
//! This crate provides:
//! - Haversine great-circle distance with built-in coordinate validation
//! - Bounding boxes for viewport and route-corridor queries
//! - Position keys (coordinates rounded to a fixed precision) used as stable
//!   identities for marker diffing and favorite deduplication
//! - Encoded polyline decoding for routing service geometries
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use clearway_geo::{distance_km, Coordinate};
//!
//! let vancouver = Coordinate::new(49.2827, -123.1207);
//! let seattle = Coordinate::new(47.6062, -122.3321);
//!
//! let d = distance_km(&vancouver, &seattle);
//! assert!((d - 195.0).abs() < 5.0);
//!
//! // Invalid input yields NaN rather than a bogus distance
//! assert!(distance_km(&vancouver, &Coordinate::new(f64::NAN, 0.0)).is_nan());
//! ```

mod bounds;
mod encoded;
mod error;
mod haversine;
mod key;

#[cfg(feature = "wasm")]
mod wasm;

pub use bounds::Bounds;
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_km, distance_m, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use key::{PositionKey, FAVORITE_KEY_DECIMALS, MARKER_KEY_DECIMALS};
pub use encoded::decode_polyline;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lng: f64,
}

impl Coordinate {
    /// Creates a new coordinate. No validation happens here; see [`Coordinate::is_valid`].
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both fields are finite and within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns the coordinate only if it is valid.
    #[inline]
    pub fn validated(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

/// Free-function form of [`Coordinate::is_valid`].
#[inline]
pub fn is_valid_coordinate(c: &Coordinate) -> bool {
    c.is_valid()
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = GeoError;

    /// Parses `"lat,lng"`; whitespace around either number is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| GeoError::InvalidCoordinate(format!("expected 'lat,lng', got '{s}'")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| GeoError::InvalidCoordinate(format!("'{}': {e}", part.trim())))
        };
        Coordinate::new(parse(lat)?, parse(lng)?)
            .validated()
            .ok_or_else(|| GeoError::InvalidCoordinate(format!("out of range: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(49.2827, -123.1207);
        assert_eq!(coord.lat, 49.2827);
        assert_eq!(coord.lng, -123.1207);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (49.2827, -123.1207).into();
        assert_eq!(coord.lat, 49.2827);
    }

    #[test]
    fn test_coordinate_from_str() {
        let coord: Coordinate = "49.2827, -123.1207".parse().unwrap();
        assert_eq!(coord, Coordinate::new(49.2827, -123.1207));

        assert!("49.2827".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("95,1".parse::<Coordinate>().is_err());
    }
}
