//! Live calls against the public services.
//!
//! Run with `cargo test -p clearway-api-client --features integration`.
//! Routing additionally needs `CLEARWAY_ORS_API_KEY`.

#![cfg(feature = "integration")]

use clearway_api_client::{ClearwayClient, ClientConfig, PlaceCategory, SearchOptions};
use clearway_geo::Coordinate;
use clearway_routes::RouteFallbackPlanner;

#[tokio::test]
async fn geocodes_a_landmark() {
    let client = ClearwayClient::with_config(ClientConfig::default()).unwrap();
    let options = SearchOptions {
        origin: Some(Coordinate::new(49.2827, -123.1207)),
        ..SearchOptions::default()
    };

    let places = client.geocoding().search("Waterfront Station", &options).await.unwrap();
    assert!(!places.is_empty());
    assert!(places.iter().all(|p| p.distance_km.is_some()));
    assert!(places.iter().any(|p| p.category != PlaceCategory::Business));
}

#[tokio::test]
async fn routes_across_town() {
    let client = ClearwayClient::new().unwrap();
    if client.config().ors_api_key.is_none() {
        eprintln!("CLEARWAY_ORS_API_KEY not set, skipping");
        return;
    }

    let plan = RouteFallbackPlanner::new()
        .plan_with(
            &client.routing(),
            Coordinate::new(49.2827, -123.1207),
            Coordinate::new(49.2488, -122.9805),
        )
        .await
        .unwrap();
    assert!(!plan.used_fallback);
    assert!(plan.primary.coordinates.len() >= 2);
}
