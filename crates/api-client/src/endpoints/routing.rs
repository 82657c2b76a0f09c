//! OpenRouteService directions
//!
//! Maps to `POST /v2/directions/{profile}`. Responses carry encoded polyline
//! geometries and summaries in metres/seconds; they are normalised into
//! [`RouteGeometry`] values in km/seconds.

use crate::client::ClearwayClient;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use clearway_geo::{decode_polyline, Coordinate};
use clearway_routes::{RouteGeometry, RoutingSource, TravelProfile};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Routing API interface
#[derive(Clone, Debug)]
pub struct OrsRoutingClient {
    client: ClearwayClient,
}

impl OrsRoutingClient {
    /// Create a new routing interface
    pub(crate) fn new(client: ClearwayClient) -> Self {
        Self { client }
    }

    /// Fetch candidate routes, best first
    ///
    /// `Ok(None)` when the service found no route. Non-2xx responses are
    /// errors.
    #[instrument(skip(self, profile), fields(profile = profile.as_str()))]
    pub async fn directions(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: TravelProfile,
    ) -> ApiResult<Option<Vec<RouteGeometry>>> {
        let config = self.client.config();
        let key = config
            .ors_api_key
            .as_deref()
            .ok_or_else(|| ApiError::MissingApiKey("openrouteservice".to_string()))?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(key)
            .map_err(|_| ApiError::config("ORS API key contains invalid characters"))?;
        headers.insert(AUTHORIZATION, auth);

        let url = format!(
            "{}/v2/directions/{}",
            config.ors_url.trim_end_matches('/'),
            profile.as_str()
        );
        let body = DirectionsRequest::new(start, end);
        let response: DirectionsResponse = self.client.post_json(&url, &body, headers).await?;

        let routes = normalize_routes(response.routes)?;
        debug!(count = routes.len(), "Routes received");
        Ok((!routes.is_empty()).then_some(routes))
    }
}

#[async_trait]
impl RoutingSource for OrsRoutingClient {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: TravelProfile,
    ) -> clearway_core::Result<Option<Vec<RouteGeometry>>> {
        Ok(self.directions(start, end, profile).await?)
    }
}

/// Request body for `/v2/directions/{profile}`
#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// `[lng, lat]` pairs
    coordinates: [[f64; 2]; 2],
    preference: &'static str,
    alternative_routes: AlternativeRoutes,
}

#[derive(Debug, Serialize)]
struct AlternativeRoutes {
    target_count: u32,
    share_factor: f64,
    weight_factor: f64,
}

impl DirectionsRequest {
    fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            coordinates: [[start.lng, start.lat], [end.lng, end.lat]],
            preference: "fastest",
            alternative_routes: AlternativeRoutes {
                target_count: 3,
                share_factor: 0.6,
                weight_factor: 2.0,
            },
        }
    }
}

/// Response body from `/v2/directions/{profile}`
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    #[serde(default)]
    summary: OrsSummary,
    #[serde(default)]
    geometry: String,
}

#[derive(Debug, Default, Deserialize)]
struct OrsSummary {
    /// Metres
    #[serde(default)]
    distance: f64,
    /// Seconds
    #[serde(default)]
    duration: f64,
}

/// Converts service routes into geometries; a bad polyline fails the batch.
fn normalize_routes(routes: Vec<OrsRoute>) -> ApiResult<Vec<RouteGeometry>> {
    routes
        .into_iter()
        .map(|route| {
            Ok(RouteGeometry {
                coordinates: decode_polyline(&route.geometry)?,
                distance_km: route.summary.distance / 1000.0,
                duration_sec: route.summary.duration,
            })
        })
        .collect()
}
