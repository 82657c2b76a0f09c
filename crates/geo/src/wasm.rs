//! WASM bindings for the geo crate.
//!
//! Lets the browser front-end share the engine's distance and key rules
//! instead of keeping its own copies.

use crate::{decode_polyline, distance_km, Coordinate, PositionKey};
use wasm_bindgen::prelude::*;

/// Great-circle distance in kilometers, `NaN` if either point is invalid.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    distance_km(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
}

/// Returns true if the coordinate is finite and within range.
#[wasm_bindgen(js_name = isValidCoordinate)]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    Coordinate::new(lat, lng).is_valid()
}

/// Favorite destination key (`"lat,lng"` at 5 decimals), empty for invalid input.
#[wasm_bindgen(js_name = buildDestinationKey)]
pub fn build_destination_key(lat: f64, lng: f64) -> String {
    PositionKey::favorite(&Coordinate::new(lat, lng))
        .map(PositionKey::into_string)
        .unwrap_or_default()
}

/// Decodes an encoded polyline into a JSON array of `[lat, lng]` pairs.
#[wasm_bindgen(js_name = decodePolyline)]
pub fn decode_polyline_json(encoded: &str) -> Result<String, JsValue> {
    let points = decode_polyline(encoded).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let pairs: Vec<[f64; 2]> = points.iter().map(|c| [c.lat, c.lng]).collect();

    serde_json::to_string(&pairs)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}
