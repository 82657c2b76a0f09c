//! Live traffic report engine for ClearWay.
//!
//! Everything between "a collection of loosely-shaped report documents" and
//! "what the map and alert panel should show":
//!
//! - [`time`]: timestamp normalisation into epoch millis, clocks
//! - [`report`]: the [`TrafficReport`] model and boundary parsing
//! - [`nearby`]: radius, route-corridor and bounding-box selection
//! - [`history`]: time-window and type filters for browsing past reports
//! - [`viewport`]: minimal marker diffing per map instance
//! - [`alert`]: the last-request-wins proximity alert controller
//! - [`source`]: the [`ReportSource`] port
//!
//! # Example
//!
//! ```
//! use clearway_geo::Coordinate;
//! use clearway_traffic::{select_nearby, TrafficReport};
//!
//! let reports = vec![
//!     TrafficReport::new("far", 49.40, -123.12),
//!     TrafficReport::new("near", 49.29, -123.12),
//! ];
//! let origin = Coordinate::new(49.2827, -123.1207);
//!
//! let nearby = select_nearby(&reports, &origin, 5.0, 0, 2 * 60 * 60 * 1000);
//! assert_eq!(nearby.len(), 1);
//! assert_eq!(nearby[0].report.id, "near");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alert;
pub mod history;
pub mod nearby;
pub mod report;
pub mod source;
pub mod time;
pub mod viewport;

pub use alert::{AlertReason, AlertState, AlertSummary, ProximityAlertController, RefreshTicket, Severity};
pub use history::{filter_history, HistoryWindow};
pub use nearby::{filter_within_bounds, route_bounds, select_near_route, select_nearby, Corridor};
pub use report::{parse_report, parse_reports, RankedReport, ReportType, TrafficReport};
pub use source::{InMemoryReportSource, ReportSource};
pub use time::{normalize_date, normalize_timestamp, time_ago, Clock, DateLike, FixedClock, SystemClock};
pub use viewport::{MarkerLayer, SyncSummary, ViewportDiff, ViewportReconciler};
