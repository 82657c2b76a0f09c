//! Rectangular lat/lng regions.
//!
//! A box whose western edge is east of its eastern edge crosses the
//! antimeridian and covers `[min_lng, 180] ∪ [-180, max_lng]`.

use crate::{Coordinate, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};

/// A map viewport or query box.
///
/// `min_lat <= max_lat` always holds. `min_lng > max_lng` marks a box that
/// wraps across ±180°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Southern edge
    pub min_lat: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Western edge
    pub min_lng: f64,
    /// Eastern edge
    pub max_lng: f64,
}

impl Bounds {
    /// Builds bounds from two latitudes in any order and the western then
    /// eastern longitude.
    ///
    /// `west > east` gives a box crossing the antimeridian.
    pub fn new(lat_a: f64, lat_b: f64, west: f64, east: f64) -> Self {
        Self {
            min_lat: lat_a.min(lat_b),
            max_lat: lat_a.max(lat_b),
            min_lng: west,
            max_lng: east,
        }
    }

    /// Smallest box containing both points, padded by `buffer_deg` on every side.
    ///
    /// Padding that runs past ±180° wraps to the other side.
    pub fn spanning(a: &Coordinate, b: &Coordinate, buffer_deg: f64) -> Self {
        let buffer = buffer_deg.max(0.0);
        let (min_lng, max_lng) = lng_span(a.lng.min(b.lng) - buffer, a.lng.max(b.lng) + buffer);
        Self {
            min_lat: (a.lat.min(b.lat) - buffer).max(-90.0),
            max_lat: (a.lat.max(b.lat) + buffer).min(90.0),
            min_lng,
            max_lng,
        }
    }

    /// Box that fully contains the circle of `radius_km` around `center`.
    ///
    /// When the circle reaches a pole the longitude span is the full range.
    /// A circle reaching past ±180° gives a wrapping box.
    pub fn around(center: &Coordinate, radius_km: f64) -> Self {
        let angular = (radius_km.max(0.0) / EARTH_RADIUS_KM).min(std::f64::consts::PI);
        let d_lat = angular.to_degrees();
        let min_lat = center.lat - d_lat;
        let max_lat = center.lat + d_lat;

        let cos_lat = center.lat.to_radians().cos();
        let ratio = angular.sin() / cos_lat;
        let d_lng = if min_lat <= -90.0 || max_lat >= 90.0 || !(0.0..1.0).contains(&ratio) {
            180.0
        } else {
            ratio.asin().to_degrees()
        };

        let (min_lng, max_lng) = lng_span(center.lng - d_lng, center.lng + d_lng);
        Self {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lng,
            max_lng,
        }
    }

    /// True when the box wraps across ±180°.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Inclusive containment. Invalid coordinates are never contained.
    pub fn contains(&self, c: &Coordinate) -> bool {
        if !c.is_valid() || c.lat < self.min_lat || c.lat > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            c.lng >= self.min_lng || c.lng <= self.max_lng
        } else {
            c.lng >= self.min_lng && c.lng <= self.max_lng
        }
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Coordinate {
        let lat = (self.min_lat + self.max_lat) / 2.0;
        if !self.crosses_antimeridian() {
            return Coordinate::new(lat, (self.min_lng + self.max_lng) / 2.0);
        }
        let lng = (self.min_lng + self.max_lng + 360.0) / 2.0;
        Coordinate::new(lat, if lng > 180.0 { lng - 360.0 } else { lng })
    }

    /// True when every edge is in range and the latitudes are ordered.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.min_lat)
            && (-90.0..=90.0).contains(&self.max_lat)
            && (-180.0..=180.0).contains(&self.min_lng)
            && (-180.0..=180.0).contains(&self.max_lng)
            && self.min_lat <= self.max_lat
    }
}

/// Western and eastern edges for the interval `[west, east]`, wrapping
/// whichever edge runs past ±180°. Spans of 360° or more cover everything.
fn lng_span(west: f64, east: f64) -> (f64, f64) {
    if east - west >= 360.0 {
        return (-180.0, 180.0);
    }
    let wrap = |lng: f64| {
        if lng < -180.0 {
            lng + 360.0
        } else if lng > 180.0 {
            lng - 360.0
        } else {
            lng
        }
    };
    (wrap(west), wrap(east))
}
