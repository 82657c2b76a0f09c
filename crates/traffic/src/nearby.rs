//! Proximity selection over report sets.

use crate::report::{RankedReport, TrafficReport};
use clearway_geo::{distance_km, Bounds, Coordinate};
use std::collections::HashSet;

/// Selects reports near `origin`, closest first.
///
/// Reports with invalid positions, farther than `radius_km`, or older than
/// `max_age_ms` are dropped; both limits are inclusive. Among the rest,
/// duplicate ids keep their first occurrence. A report without a timestamp counts as age 0. An
/// invalid origin selects nothing. Ties keep input order.
pub fn select_nearby(
    reports: &[TrafficReport],
    origin: &Coordinate,
    radius_km: f64,
    now_ms: i64,
    max_age_ms: i64,
) -> Vec<RankedReport> {
    rank_by(reports, now_ms, max_age_ms, |report| {
        Some(distance_km(origin, &report.coordinate())).filter(|d| *d <= radius_km)
    })
}

/// Reports along a route: inside the padded box spanning both endpoints and
/// within `radius_km` of either one.
///
/// Ranked by distance to the nearer endpoint.
pub fn select_near_route(
    reports: &[TrafficReport],
    start: &Coordinate,
    end: &Coordinate,
    corridor: Corridor,
    now_ms: i64,
    max_age_ms: i64,
) -> Vec<RankedReport> {
    if !start.is_valid() || !end.is_valid() {
        return Vec::new();
    }
    let bounds = route_bounds(start, end, corridor.buffer_deg);
    rank_by(reports, now_ms, max_age_ms, |report| {
        let position = report.coordinate();
        if !bounds.contains(&position) {
            return None;
        }
        let nearest = distance_km(start, &position).min(distance_km(end, &position));
        (nearest <= corridor.radius_km).then_some(nearest)
    })
}

/// Box spanning a route's endpoints, padded by `buffer_deg`.
pub fn route_bounds(start: &Coordinate, end: &Coordinate, buffer_deg: f64) -> Bounds {
    Bounds::spanning(start, end, buffer_deg)
}

/// Reports inside `bounds` and no older than `max_age_ms`, in input order.
pub fn filter_within_bounds(
    reports: &[TrafficReport],
    bounds: &Bounds,
    now_ms: i64,
    max_age_ms: i64,
) -> Vec<TrafficReport> {
    let mut seen = HashSet::new();
    reports
        .iter()
        .filter(|r| r.has_valid_position() && bounds.contains(&r.coordinate()))
        .filter(|r| r.age_ms(now_ms) <= max_age_ms)
        .filter(|r| seen.insert(r.id.as_str()))
        .cloned()
        .collect()
}

/// Route corridor parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corridor {
    /// Padding around the endpoint box, degrees
    pub buffer_deg: f64,
    /// Max distance from either endpoint, km
    pub radius_km: f64,
}

impl Default for Corridor {
    fn default() -> Self {
        Self {
            buffer_deg: 0.1,
            radius_km: 5.0,
        }
    }
}

fn rank_by<F>(reports: &[TrafficReport], now_ms: i64, max_age_ms: i64, distance: F) -> Vec<RankedReport>
where
    F: Fn(&TrafficReport) -> Option<f64>,
{
    let mut seen = HashSet::with_capacity(reports.len());
    let mut ranked: Vec<RankedReport> = reports
        .iter()
        .filter(|r| r.has_valid_position())
        .filter(|r| r.age_ms(now_ms) <= max_age_ms)
        // NaN never passes a `<=` comparison, so invalid origins drop here
        .filter_map(|r| distance(r).map(|distance_km| (r, distance_km)))
        .filter(|(r, _)| seen.insert(r.id.as_str()))
        .map(|(r, distance_km)| RankedReport {
            report: r.clone(),
            distance_km,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOW: i64 = 1_709_294_400_000;
    const TWO_HOURS: i64 = 2 * 60 * 60 * 1000;

    fn origin() -> Coordinate {
        Coordinate::new(49.2827, -123.1207)
    }

    /// Report due north of the origin at roughly `km`.
    fn north_of_origin(id: &str, km: f64) -> TrafficReport {
        let d_lat = (km / clearway_geo::EARTH_RADIUS_KM).to_degrees();
        TrafficReport::new(id, origin().lat + d_lat, origin().lng)
    }

    #[test]
    fn test_radius_is_inclusive() {
        let inside = north_of_origin("in", 5.0);
        let exact = distance_km(&origin(), &inside.coordinate());
        let outside = north_of_origin("out", 5.001);

        let selected = select_nearby(&[inside, outside], &origin(), exact, NOW, TWO_HOURS);
        let ids: Vec<_> = selected.iter().map(|r| r.report.id.as_str()).collect();
        assert_eq!(ids, ["in"]);
    }

    #[test]
    fn test_age_is_inclusive() {
        let reports = [
            north_of_origin("exact", 1.0).with_created_at(NOW - TWO_HOURS),
            north_of_origin("stale", 1.0).with_created_at(NOW - TWO_HOURS - 1),
            north_of_origin("undated", 1.0),
        ];
        let selected = select_nearby(&reports, &origin(), 5.0, NOW, TWO_HOURS);
        let ids: Vec<_> = selected.iter().map(|r| r.report.id.as_str()).collect();
        assert_eq!(ids, ["exact", "undated"]);
    }

    #[test]
    fn test_sorted_by_distance() {
        let reports = [
            north_of_origin("five", 5.0),
            north_of_origin("one", 1.0),
            north_of_origin("three", 3.0),
        ];
        let selected = select_nearby(&reports, &origin(), 10.0, NOW, TWO_HOURS);
        let ids: Vec<_> = selected.iter().map(|r| r.report.id.as_str()).collect();
        assert_eq!(ids, ["one", "three", "five"]);
        assert!((selected[0].distance_km - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_and_duplicate_reports_skipped() {
        let reports = [
            north_of_origin("a", 1.0),
            TrafficReport::new("bad", f64::NAN, 0.0),
            TrafficReport::new("far-lat", 95.0, 0.0),
            north_of_origin("a", 2.0),
        ];
        let selected = select_nearby(&reports, &origin(), 10.0, NOW, TWO_HOURS);
        assert_eq!(selected.len(), 1);
        assert!((selected[0].distance_km - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_id_keeps_first_qualifying_copy() {
        let reports = [
            north_of_origin("a", 1.0).with_created_at(NOW - 3 * 60 * 60 * 1000),
            north_of_origin("a", 20.0),
            TrafficReport::new("a", f64::NAN, 0.0),
            north_of_origin("a", 2.0).with_created_at(NOW),
            north_of_origin("a", 3.0),
        ];
        let selected = select_nearby(&reports, &origin(), 5.0, NOW, TWO_HOURS);
        assert_eq!(selected.len(), 1);
        assert!((selected[0].distance_km - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_filter_within_bounds_dedups_after_filtering() {
        let bounds = Bounds::new(49.0, 50.0, -124.0, -123.0);
        let reports = [
            TrafficReport::new("a", 48.0, -123.5),
            TrafficReport::new("a", 49.5, -123.5).with_created_at(NOW - TWO_HOURS - 1),
            TrafficReport::new("a", 49.6, -123.6),
        ];
        let kept = filter_within_bounds(&reports, &bounds, NOW, TWO_HOURS);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].lat, 49.6);
    }

    #[test]
    fn test_invalid_origin_selects_nothing() {
        let reports = [north_of_origin("a", 0.0)];
        let bad = Coordinate::new(f64::NAN, 0.0);
        assert!(select_nearby(&reports, &bad, 10.0, NOW, TWO_HOURS).is_empty());
    }

    #[test]
    fn test_near_route_uses_either_endpoint() {
        let start = Coordinate::new(49.2827, -123.1207);
        let end = Coordinate::new(49.2500, -123.0000);
        let reports = [
            TrafficReport::new("near-end", 49.2510, -123.0010),
            TrafficReport::new("near-start", 49.2830, -123.1200),
            // Inside the padded box but far from both endpoints
            TrafficReport::new("middle", 49.3700, -123.0600),
            TrafficReport::new("outside", 48.0000, -123.0600),
        ];
        let selected = select_near_route(&reports, &start, &end, Corridor::default(), NOW, TWO_HOURS);
        let ids: Vec<_> = selected.iter().map(|r| r.report.id.as_str()).collect();
        assert_eq!(ids, ["near-start", "near-end"]);
    }

    #[test]
    fn test_filter_within_bounds() {
        let bounds = Bounds::new(49.0, 50.0, -124.0, -123.0);
        let reports = [
            TrafficReport::new("in", 49.5, -123.5),
            TrafficReport::new("edge", 49.0, -123.0),
            TrafficReport::new("out", 48.9, -123.5),
            TrafficReport::new("old", 49.5, -123.5).with_created_at(NOW - TWO_HOURS - 1),
        ];
        let kept = filter_within_bounds(&reports, &bounds, NOW, TWO_HOURS);
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["in", "edge"]);
    }

    proptest! {
        #[test]
        fn prop_selection_sorted_and_within_radius(
            points in prop::collection::vec((49.0f64..49.6, -123.5f64..-122.8), 0..40),
            radius in 0.0f64..40.0,
        ) {
            let reports: Vec<_> = points
                .iter()
                .enumerate()
                .map(|(i, (lat, lng))| TrafficReport::new(i.to_string(), *lat, *lng))
                .collect();
            let selected = select_nearby(&reports, &origin(), radius, NOW, TWO_HOURS);

            prop_assert!(selected.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
            prop_assert!(selected.iter().all(|r| r.distance_km <= radius));
            let expected = reports
                .iter()
                .filter(|r| distance_km(&origin(), &r.coordinate()) <= radius)
                .count();
            prop_assert_eq!(selected.len(), expected);
        }
    }
}
