//! Nominatim place search
//!
//! Maps to `GET /search?format=json&addressdetails=1`. Results are
//! normalised into [`Place`] values, classified, and optionally annotated
//! with their distance from an origin.

use crate::client::ClearwayClient;
use crate::error::ApiResult;
use clearway_geo::{distance_km, Coordinate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default number of results requested
pub const DEFAULT_LIMIT: usize = 5;

/// Geocoding API interface
#[derive(Clone, Debug)]
pub struct NominatimClient {
    client: ClearwayClient,
}

/// Search parameters
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Max results
    pub limit: usize,
    /// Only return results inside the configured viewbox
    pub bounded: bool,
    /// Attach distances from this point
    pub origin: Option<Coordinate>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            bounded: true,
            origin: None,
        }
    }
}

/// Broad kind of a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    /// Amenities, shops, attractions
    Business,
    /// Homes
    Residential,
    /// Roads and rail
    Transport,
    /// Anything else
    Location,
}

impl PlaceCategory {
    /// Classify from Nominatim's `class` and `type` fields
    pub fn classify(class: &str, kind: &str) -> Self {
        match (class, kind) {
            ("amenity" | "shop" | "tourism", _) => Self::Business,
            ("building", "residential") => Self::Residential,
            ("highway" | "railway", _) => Self::Transport,
            _ => Self::Location,
        }
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Residential => "residential",
            Self::Transport => "transport",
            Self::Location => "location",
        }
    }
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Short name, the first component of the address
    pub name: String,
    /// Full address
    pub address: String,
    /// Position
    pub coordinate: Coordinate,
    /// Kind of place
    pub category: PlaceCategory,
    /// Nominatim relevance score
    pub importance: f64,
    /// Distance from the search origin, when one was given
    pub distance_km: Option<f64>,
}

impl Place {
    /// Address trimmed to its first three components
    pub fn short_address(&self) -> String {
        let parts: Vec<&str> = self.address.split(',').map(str::trim).collect();
        if parts.len() > 3 {
            format!("{}...", parts[..3].join(", "))
        } else {
            self.address.clone()
        }
    }
}

/// Raw Nominatim result
#[derive(Debug, Deserialize)]
struct NominatimItem {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    class: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    importance: Option<f64>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    format: &'static str,
    limit: usize,
    addressdetails: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    countrycodes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    viewbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounded: Option<u8>,
}

impl NominatimClient {
    /// Create a new geocoding interface
    pub(crate) fn new(client: ClearwayClient) -> Self {
        Self { client }
    }

    /// Search for places matching `query`, most relevant first
    ///
    /// A blank query returns no results without a request.
    #[instrument(skip(self, options))]
    pub async fn search(&self, query: &str, options: &SearchOptions) -> ApiResult<Vec<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let config = self.client.config();
        let viewbox = config
            .viewbox
            .map(|[min_lng, min_lat, max_lng, max_lat]| format!("{min_lng},{min_lat},{max_lng},{max_lat}"));
        let params = SearchQuery {
            q: query,
            format: "json",
            limit: options.limit,
            addressdetails: 1,
            countrycodes: config.country_codes.as_deref(),
            bounded: (options.bounded && viewbox.is_some()).then_some(1),
            viewbox,
        };

        let url = format!("{}/search", config.nominatim_url.trim_end_matches('/'));
        let items: Vec<NominatimItem> = self.client.get_json(&url, &params).await?;
        let places = normalize_results(items, query, options.origin);
        debug!(count = places.len(), "Places found");
        Ok(places)
    }
}

fn normalize_results(items: Vec<NominatimItem>, query: &str, origin: Option<Coordinate>) -> Vec<Place> {
    let mut places: Vec<Place> = items
        .into_iter()
        .filter_map(|item| {
            let lat = item.lat.trim().parse().ok()?;
            let lng = item.lon.trim().parse().ok()?;
            let coordinate = Coordinate::new(lat, lng).validated()?;

            let name = item
                .display_name
                .split(',')
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(query)
                .to_string();

            Some(Place {
                name,
                category: PlaceCategory::classify(&item.class, &item.kind),
                importance: item.importance.unwrap_or(0.0),
                distance_km: origin.map(|o| distance_km(&o, &coordinate)).filter(|d| d.is_finite()),
                address: item.display_name,
                coordinate,
            })
        })
        .collect();

    places.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    places
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"[
        {"display_name": "Waterfront Station, Howe Street, Downtown, Vancouver, BC", "lat": "49.2858", "lon": "-123.1117", "class": "railway", "type": "station", "importance": 0.41},
        {"display_name": "Tim Hortons, Granville Street, Vancouver", "lat": "49.2800", "lon": "-123.1200", "class": "amenity", "type": "cafe", "importance": 0.55},
        {"display_name": "Broken", "lat": "north", "lon": "-123.1"},
        {"display_name": "", "lat": "49.27", "lon": "-123.10", "class": "place", "type": "neighbourhood"}
    ]"#;

    #[test]
    fn test_classify() {
        assert_eq!(PlaceCategory::classify("shop", "bakery"), PlaceCategory::Business);
        assert_eq!(PlaceCategory::classify("building", "residential"), PlaceCategory::Residential);
        assert_eq!(PlaceCategory::classify("building", "office"), PlaceCategory::Location);
        assert_eq!(PlaceCategory::classify("highway", "primary"), PlaceCategory::Transport);
    }

    #[test]
    fn test_normalize_results() {
        let items: Vec<NominatimItem> = serde_json::from_str(RESPONSE).unwrap();
        let origin = Coordinate::new(49.2827, -123.1207);
        let places = normalize_results(items, "coffee", Some(origin));

        assert_eq!(places.len(), 3);
        assert_eq!(places[0].name, "Tim Hortons");
        assert_eq!(places[0].category, PlaceCategory::Business);
        assert_eq!(places[1].category, PlaceCategory::Transport);
        assert_eq!(places[2].name, "coffee");
        assert!(places.iter().all(|p| p.distance_km.is_some_and(|d| d < 5.0)));
    }

    #[test]
    fn test_short_address() {
        let items: Vec<NominatimItem> = serde_json::from_str(RESPONSE).unwrap();
        let places = normalize_results(items, "q", None);
        let station = places.iter().find(|p| p.name == "Waterfront Station").unwrap();
        assert_eq!(station.short_address(), "Waterfront Station, Howe Street, Downtown...");
        assert!(station.distance_km.is_none());
    }

    #[test]
    fn test_query_string() {
        let params = SearchQuery {
            q: "stanley park",
            format: "json",
            limit: 5,
            addressdetails: 1,
            countrycodes: Some("ca"),
            viewbox: None,
            bounded: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["q"], "stanley park");
        assert_eq!(json["limit"], 5);
        assert!(json.get("viewbox").is_none());
    }

    #[test]
    fn test_blank_query_skips_request() {
        let client = ClearwayClient::with_config(crate::ClientConfig::default()).unwrap();
        let geocoding = client.geocoding();
        let places =
            tokio_test::block_on(geocoding.search("   ", &SearchOptions::default())).unwrap();
        assert!(places.is_empty());
    }
}
