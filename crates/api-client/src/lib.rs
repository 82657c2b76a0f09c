//! HTTP bindings for the services ClearWay depends on
//!
//! This crate provides concrete implementations of the engine's remote ports:
//!
//! - **Routing**: OpenRouteService directions with alternatives, implementing
//!   [`clearway_routes::RoutingSource`]
//! - **Geocoding**: Nominatim place search with result classification and
//!   distances from an origin
//! - **Environment-based configuration**: URLs, API key and timeout from
//!   environment variables
//! - **Request correlation**: every request carries a unique ID for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use clearway_api_client::{ClearwayClient, SearchOptions};
//! use clearway_geo::Coordinate;
//! use clearway_routes::RouteFallbackPlanner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClearwayClient::new()?;
//!
//!     let places = client.geocoding().search("Stanley Park", &SearchOptions::default()).await?;
//!     let Some(place) = places.first() else { return Ok(()) };
//!
//!     let start = Coordinate::new(49.2827, -123.1207);
//!     let plan = RouteFallbackPlanner::new()
//!         .plan_with(&client.routing(), start, place.coordinate)
//!         .await?;
//!     println!("{:.1} km, fallback: {}", plan.primary.distance_km, plan.used_fallback);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::ClearwayClient;
pub use config::ClientConfig;
pub use endpoints::{NominatimClient, OrsRoutingClient, Place, PlaceCategory, SearchOptions};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ClearwayClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{NominatimClient, OrsRoutingClient, Place, PlaceCategory, SearchOptions};
    pub use crate::error::{ApiError, ApiResult};
}
