//! Routes and favorites for ClearWay.
//!
//! - [`planner`]: picks service routes or a straight-line estimate so a route
//!   is always available
//! - [`favorites`]: toggles saved routes against an eventually-consistent
//!   store without leaving duplicates behind
//! - [`format`]: distance and duration labels

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod favorites;
pub mod format;
pub mod planner;

pub use favorites::{
    build_key, FavoriteDraft, FavoriteRoute, FavoriteState, FavoritesReconciler, FavoritesStore,
    InMemoryFavoritesStore, StoredFavorite,
};
pub use format::{format_distance, format_duration, format_minutes};
pub use planner::{
    path_length_km, RouteFallbackPlanner, RouteGeometry, RoutePlan, RoutingSource, TravelProfile,
};
