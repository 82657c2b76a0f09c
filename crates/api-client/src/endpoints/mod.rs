//! Service-specific bindings
//!
//! | Module | Service | Description |
//! |--------|---------|-------------|
//! | `routing` | OpenRouteService `/v2/directions` | Driving and walking routes with alternatives |
//! | `geocoding` | Nominatim `/search` | Place search with result classification |

pub mod geocoding;
pub mod routing;

pub use geocoding::{NominatimClient, Place, PlaceCategory, SearchOptions};
pub use routing::OrsRoutingClient;
