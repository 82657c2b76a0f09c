//! Encoded polyline decoding.
//!
//! Routing services return geometries in the encoded polyline format at
//! precision 1e5. Decoding is done by the `polyline` crate; this module maps
//! its `x`/`y` output onto [`Coordinate`] and its failures onto [`GeoError`].

use crate::{Coordinate, GeoError, Result};

/// Decimal digits carried by routing service geometries.
const PRECISION: u32 = 5;

/// Decodes an encoded polyline into `[lat, lng]` coordinates.
///
/// An empty string decodes to an empty list. Characters outside the encoding
/// alphabet, a latitude with no longitude, or out-of-range points are errors.
///
/// # Example
/// ```
/// use clearway_geo::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// assert!((points[0].lng - -120.2).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>> {
    let line = polyline::decode_polyline(encoded, PRECISION)
        .map_err(|e| GeoError::InvalidPolyline(e.to_string()))?;

    Ok(line
        .0
        .into_iter()
        .map(|point| Coordinate::new(point.y, point.x))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(points.len(), expected.len());
        for (p, (lat, lng)) in points.iter().zip(expected) {
            assert!((p.lat - lat).abs() < 1e-9, "{} vs {}", p.lat, lat);
            assert!((p.lng - lng).abs() < 1e-9, "{} vs {}", p.lng, lng);
        }
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn test_latitude_without_longitude() {
        let err = decode_polyline("_p~iF").unwrap_err();
        assert!(matches!(err, GeoError::InvalidPolyline(_)));
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert!(decode_polyline("_p~iF ps|U").is_err());
    }
}
