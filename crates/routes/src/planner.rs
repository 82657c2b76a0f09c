//! Route planning with a straight-line fallback.
//!
//! Geometry comes from a remote routing service. When that service fails,
//! returns nothing, or returns unusable shapes, the planner substitutes the
//! straight line between the endpoints with an estimated duration, so a
//! route is always available.

use async_trait::async_trait;
use clearway_core::config::RoutingConfig;
use clearway_core::{Error, Result};
use clearway_geo::{distance_km, Coordinate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A drawable route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGeometry {
    /// Path from start to end
    pub coordinates: Vec<Coordinate>,
    /// Length in km
    pub distance_km: f64,
    /// Travel time in seconds
    pub duration_sec: f64,
}

impl RouteGeometry {
    /// Drops invalid points; `None` if fewer than two remain.
    fn sanitized(mut self) -> Option<Self> {
        self.coordinates.retain(Coordinate::is_valid);
        if self.coordinates.len() < 2 {
            return None;
        }
        if !(self.distance_km.is_finite() && self.distance_km >= 0.0) {
            self.distance_km = path_length_km(&self.coordinates);
        }
        if !(self.duration_sec.is_finite() && self.duration_sec >= 0.0) {
            self.duration_sec = 0.0;
        }
        Some(self)
    }
}

/// Sum of great-circle legs along `path`.
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|leg| distance_km(&leg[0], &leg[1])).sum()
}

fn check_endpoints(start: Coordinate, end: Coordinate) -> Result<()> {
    match [start, end].into_iter().find(|p| !p.is_valid()) {
        Some(bad) => Err(Error::invalid_coordinate(bad.lat, bad.lng)),
        None => Ok(()),
    }
}

/// How the traveller moves; sets the fallback speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    /// By car
    #[default]
    Driving,
    /// On foot
    Walking,
}

impl TravelProfile {
    /// Routing service profile name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving-car",
            Self::Walking => "foot-walking",
        }
    }
}

/// Result of planning: never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    /// Route to draw and report
    pub primary: RouteGeometry,
    /// Other candidate routes from the service
    pub alternatives: Vec<RouteGeometry>,
    /// True when the primary route is the straight-line estimate
    pub used_fallback: bool,
}

/// Where route geometry comes from.
#[async_trait]
pub trait RoutingSource: Send + Sync {
    /// Candidate routes, best first. `Ok(None)` means the service found none.
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: TravelProfile,
    ) -> Result<Option<Vec<RouteGeometry>>>;
}

/// Chooses between service routes and the straight-line estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteFallbackPlanner {
    profile: TravelProfile,
    driving_speed_kmh: f64,
    walking_speed_kmh: f64,
}

impl Default for RouteFallbackPlanner {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl RouteFallbackPlanner {
    /// Planner for driving at the default speeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner using the `[routing]` configuration section.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            profile: TravelProfile::Driving,
            driving_speed_kmh: config.driving_speed_kmh,
            walking_speed_kmh: config.walking_speed_kmh,
        }
    }

    /// Builder-style method to set the travel profile
    #[must_use]
    pub fn with_profile(mut self, profile: TravelProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Active travel profile.
    pub fn profile(&self) -> TravelProfile {
        self.profile
    }

    /// Average speed assumed by the fallback estimate.
    pub fn speed_kmh(&self) -> f64 {
        match self.profile {
            TravelProfile::Driving => self.driving_speed_kmh,
            TravelProfile::Walking => self.walking_speed_kmh,
        }
    }

    /// Picks the plan from service `candidates`.
    ///
    /// Candidates with fewer than two valid points are skipped; the first
    /// usable one becomes the primary route. With no usable candidate the
    /// straight line from `start` to `end` is used.
    ///
    /// Fails only when an endpoint is not a valid coordinate.
    pub fn plan(
        &self,
        candidates: Option<Vec<RouteGeometry>>,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RoutePlan> {
        check_endpoints(start, end)?;

        let mut usable = candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(RouteGeometry::sanitized);

        Ok(match usable.next() {
            Some(primary) => RoutePlan {
                primary,
                alternatives: usable.collect(),
                used_fallback: false,
            },
            None => RoutePlan {
                primary: self.straight_line(start, end),
                alternatives: Vec::new(),
                used_fallback: true,
            },
        })
    }

    /// Fetches candidates from `source`, falling back on any service failure.
    ///
    /// Invalid endpoints are rejected before the service is called.
    pub async fn plan_with(
        &self,
        source: &dyn RoutingSource,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RoutePlan> {
        check_endpoints(start, end)?;
        let candidates = match source.fetch_route(start, end, self.profile).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "Route service failed, using straight line");
                None
            }
        };

        let plan = self.plan(candidates, start, end)?;
        if plan.used_fallback {
            warn!(%start, %end, "No usable route from service, using straight line");
        } else {
            debug!(
                distance_km = plan.primary.distance_km,
                alternatives = plan.alternatives.len(),
                "Route planned"
            );
        }
        Ok(plan)
    }

    /// Straight-line estimate between two valid points.
    fn straight_line(&self, start: Coordinate, end: Coordinate) -> RouteGeometry {
        let distance = distance_km(&start, &end);
        RouteGeometry {
            coordinates: vec![start, end],
            distance_km: distance,
            duration_sec: distance / self.speed_kmh() * 3600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearway_core::Error;
    use std::sync::Mutex;

    fn start() -> Coordinate {
        Coordinate::new(49.2827, -123.1207)
    }

    fn end() -> Coordinate {
        Coordinate::new(49.2488, -122.9805)
    }

    fn route(points: &[(f64, f64)], distance_km: f64) -> RouteGeometry {
        RouteGeometry {
            coordinates: points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng)).collect(),
            distance_km,
            duration_sec: 600.0,
        }
    }

    /// Routing source that replays canned responses and records calls.
    struct MockRoutingSource {
        response: Mutex<Option<Result<Option<Vec<RouteGeometry>>>>>,
        calls: Mutex<Vec<TravelProfile>>,
    }

    impl MockRoutingSource {
        fn new(response: Result<Option<Vec<RouteGeometry>>>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RoutingSource for MockRoutingSource {
        async fn fetch_route(
            &self,
            _start: Coordinate,
            _end: Coordinate,
            profile: TravelProfile,
        ) -> Result<Option<Vec<RouteGeometry>>> {
            self.calls.lock().unwrap().push(profile);
            self.response.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    #[test]
    fn test_no_candidates_falls_back_to_straight_line() {
        let plan = RouteFallbackPlanner::new().plan(None, start(), end()).unwrap();
        assert!(plan.used_fallback);
        assert_eq!(plan.primary.coordinates, vec![start(), end()]);
        assert_eq!(plan.primary.distance_km, distance_km(&start(), &end()));
        assert!(plan.alternatives.is_empty());
    }

    #[test]
    fn test_fallback_duration_uses_profile_speed() {
        let driving = RouteFallbackPlanner::new().straight_line(start(), end());
        let walking = RouteFallbackPlanner::new()
            .with_profile(TravelProfile::Walking)
            .straight_line(start(), end());

        let expected = driving.distance_km / 50.0 * 3600.0;
        assert!((driving.duration_sec - expected).abs() < 1e-9);
        assert!((walking.duration_sec - driving.duration_sec * 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_first_usable_candidate_is_primary() {
        let candidates = vec![
            route(&[(49.28, -123.12)], 3.0),
            route(&[(49.28, -123.12), (f64::NAN, 0.0)], 4.0),
            route(&[(49.28, -123.12), (49.26, -123.05), (49.25, -122.98)], 12.5),
            route(&[(49.28, -123.12), (49.25, -122.98)], 13.0),
        ];
        let plan = RouteFallbackPlanner::new().plan(Some(candidates), start(), end()).unwrap();
        assert!(!plan.used_fallback);
        assert_eq!(plan.primary.distance_km, 12.5);
        assert_eq!(plan.alternatives.len(), 1);
        assert_eq!(plan.alternatives[0].distance_km, 13.0);
    }

    #[test]
    fn test_unusable_candidates_fall_back() {
        let candidates = vec![route(&[], 0.0), route(&[(91.0, 0.0), (49.0, -123.0)], 1.0)];
        let plan = RouteFallbackPlanner::new().plan(Some(candidates), start(), end()).unwrap();
        assert!(plan.used_fallback);
    }

    #[tokio::test]
    async fn test_plan_with_service_error_falls_back() {
        let source = MockRoutingSource::new(Err(Error::fetch_failed("ORS failed 503")));
        let plan = RouteFallbackPlanner::new().plan_with(&source, start(), end()).await.unwrap();
        assert!(plan.used_fallback);
        assert_eq!(source.calls.lock().unwrap().as_slice(), [TravelProfile::Driving]);
    }

    #[tokio::test]
    async fn test_plan_with_service_route() {
        let candidates = vec![route(&[(49.28, -123.12), (49.25, -122.98)], 12.0)];
        let source = MockRoutingSource::new(Ok(Some(candidates)));
        let planner = RouteFallbackPlanner::new().with_profile(TravelProfile::Walking);
        let plan = planner.plan_with(&source, start(), end()).await.unwrap();
        assert!(!plan.used_fallback);
        assert_eq!(plan.primary.distance_km, 12.0);
        assert_eq!(source.calls.lock().unwrap().as_slice(), [TravelProfile::Walking]);
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let bad = Coordinate::new(f64::NAN, -123.0);
        let err = RouteFallbackPlanner::new().plan(None, bad, end()).unwrap_err();
        assert!(err.is_validation());

        let err = RouteFallbackPlanner::new()
            .plan(None, start(), Coordinate::new(49.0, 181.0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_plan_with_rejects_invalid_endpoint_without_calling_service() {
        let source = MockRoutingSource::new(Ok(None));
        let result = RouteFallbackPlanner::new()
            .plan_with(&source, Coordinate::new(95.0, 0.0), end())
            .await;
        assert!(result.unwrap_err().is_validation());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    proptest::proptest! {
        #[test]
        fn prop_fallback_is_total_for_valid_endpoints(
            lat_a in -90.0f64..=90.0, lng_a in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0, lng_b in -180.0f64..=180.0,
        ) {
            let (a, b) = (Coordinate::new(lat_a, lng_a), Coordinate::new(lat_b, lng_b));
            let plan = RouteFallbackPlanner::new().plan(None, a, b).unwrap();
            proptest::prop_assert!(plan.used_fallback);
            proptest::prop_assert_eq!(plan.primary.coordinates.len(), 2);
            proptest::prop_assert!(plan.primary.distance_km >= 0.0);
            proptest::prop_assert!(plan.primary.duration_sec >= 0.0);
        }
    }

    #[test]
    fn test_bad_candidate_distance_is_recomputed() {
        let candidates = vec![route(&[(49.28, -123.12), (49.25, -122.98)], f64::NAN)];
        let plan = RouteFallbackPlanner::new().plan(Some(candidates), start(), end()).unwrap();
        let expected = path_length_km(&plan.primary.coordinates);
        assert!((plan.primary.distance_km - expected).abs() < 1e-9);
    }
}
