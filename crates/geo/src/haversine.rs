//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Both coordinates are validated first. If either is invalid the result is
/// `NaN`, which every consumer in the engine treats as "infinitely far".
///
/// # Example
/// ```
/// use clearway_geo::{distance_km, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = distance_km(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Same as [`distance_km`], in meters.
#[inline]
pub fn distance_m(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    if !from.is_valid() || !to.is_valid() {
        return f64::NAN;
    }

    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    // abs() keeps the result bit-identical when the arguments are swapped
    let d_lat = (lat2 - lat1).abs();
    let d_lon = (lon2 - lon1).abs();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    radius * c
}
