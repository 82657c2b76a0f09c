//! Proximity alert state machine.
//!
//! The controller tracks one "reports near me" panel. Refreshes may overlap;
//! each one gets a monotonically increasing token and only the newest token's
//! result is applied. Older completions are dropped without touching state,
//! so a slow early fetch can never overwrite a fast later one.
//!
//! ```text
//! Idle ──request──▶ Loading ──complete(ok)──▶ Populated
//!                      │
//!                      └──complete(err)──▶ Error(reason)
//! ```

use crate::nearby::select_nearby;
use crate::report::{RankedReport, TrafficReport};
use crate::source::ReportSource;
use crate::time::{Clock, SystemClock};
use clearway_core::config::NearbyConfig;
use clearway_core::{Error, ErrorCode, Result};
use clearway_geo::{Bounds, Coordinate};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Why the panel could not show reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertReason {
    /// No report source configured or reachable
    Unavailable,
    /// The source returned an error
    FetchFailed,
    /// No origin to search around
    NoLocation,
}

impl AlertReason {
    /// Stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::FetchFailed => "fetch-failed",
            Self::NoLocation => "no-location",
        }
    }

    /// Maps an engine error onto the reason shown to the user.
    pub fn from_error(error: &Error) -> Self {
        match error.code {
            ErrorCode::SourceUnavailable => Self::Unavailable,
            ErrorCode::NoLocation => Self::NoLocation,
            _ => Self::FetchFailed,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unavailable => "Traffic reports are unavailable right now",
            Self::FetchFailed => "Could not load traffic reports",
            Self::NoLocation => "Location unknown; enable location to see nearby reports",
        }
    }
}

impl std::fmt::Display for AlertReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AlertState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting on the refresh with this token
    Loading {
        /// Token of the outstanding refresh
        token: u64,
    },
    /// Reports near the origin, closest first; empty means all clear
    Populated {
        /// Selected reports
        reports: Vec<RankedReport>,
    },
    /// The last refresh failed
    Error(AlertReason),
}

impl AlertState {
    /// Populated with nothing nearby.
    pub fn is_all_clear(&self) -> bool {
        matches!(self, Self::Populated { reports } if reports.is_empty())
    }

    /// Number of reports shown.
    pub fn count(&self) -> usize {
        match self {
            Self::Populated { reports } => reports.len(),
            _ => 0,
        }
    }

    /// Reports shown, empty outside [`AlertState::Populated`].
    pub fn reports(&self) -> &[RankedReport] {
        match self {
            Self::Populated { reports } => reports,
            _ => &[],
        }
    }
}

/// Handle for one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshTicket {
    /// Monotonic request token
    pub token: u64,
    /// Origin the refresh searches around
    pub origin: Coordinate,
    /// Search radius
    pub radius_km: f64,
}

impl RefreshTicket {
    /// Query box that covers the search circle.
    pub fn bounds(&self) -> Bounds {
        Bounds::around(&self.origin, self.radius_km)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: AlertState,
    latest_token: u64,
    last_origin: Option<Coordinate>,
}

/// Drives the nearby-reports panel.
pub struct ProximityAlertController {
    inner: Mutex<Inner>,
    source: Option<Arc<dyn ReportSource>>,
    clock: Arc<dyn Clock>,
    radius_km: f64,
    max_age_ms: i64,
}

impl std::fmt::Debug for ProximityAlertController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityAlertController")
            .field("has_source", &self.source.is_some())
            .field("radius_km", &self.radius_km)
            .field("max_age_ms", &self.max_age_ms)
            .finish_non_exhaustive()
    }
}

impl ProximityAlertController {
    /// Controller with default radius (5 km) and age window (2 h).
    pub fn new(source: Option<Arc<dyn ReportSource>>) -> Self {
        Self::from_config(&NearbyConfig::default(), source)
    }

    /// Controller using the `[nearby]` configuration section.
    pub fn from_config(config: &NearbyConfig, source: Option<Arc<dyn ReportSource>>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            source,
            clock: Arc::new(SystemClock),
            radius_km: config.radius_km,
            max_age_ms: config.max_age_ms(),
        }
    }

    /// Builder-style method to set the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Default search radius.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Current state.
    pub fn state(&self) -> AlertState {
        self.lock().state.clone()
    }

    /// Starts a refresh and returns its ticket.
    ///
    /// A missing or invalid `origin` reuses the last known one. With no origin
    /// at all the state moves straight to `Error(NoLocation)` and `None` is
    /// returned; any refresh still in flight is superseded either way. A
    /// non-positive `radius_km` falls back to the configured radius.
    pub fn request_refresh(&self, origin: Option<Coordinate>, radius_km: f64) -> Option<RefreshTicket> {
        let mut inner = self.lock();
        inner.latest_token += 1;
        let token = inner.latest_token;

        let origin = origin.filter(Coordinate::is_valid).or(inner.last_origin);
        let Some(origin) = origin else {
            info!(token, "No origin for nearby refresh");
            inner.state = AlertState::Error(AlertReason::NoLocation);
            return None;
        };
        inner.last_origin = Some(origin);

        let radius_km = if radius_km.is_finite() && radius_km > 0.0 {
            radius_km
        } else {
            self.radius_km
        };
        inner.state = AlertState::Loading { token };
        debug!(token, %origin, radius_km, "Nearby refresh requested");

        Some(RefreshTicket {
            token,
            origin,
            radius_km,
        })
    }

    /// Applies the outcome of a refresh.
    ///
    /// Returns `false`, leaving state untouched, when a newer refresh has been
    /// requested since `ticket` was issued.
    pub fn complete(&self, ticket: &RefreshTicket, outcome: Result<Vec<TrafficReport>>) -> bool {
        let mut inner = self.lock();
        if ticket.token != inner.latest_token {
            debug!(
                token = ticket.token,
                latest = inner.latest_token,
                "Dropping stale nearby result"
            );
            return false;
        }

        inner.state = match outcome {
            Ok(reports) => {
                let selected = select_nearby(
                    &reports,
                    &ticket.origin,
                    ticket.radius_km,
                    self.clock.now_ms(),
                    self.max_age_ms,
                );
                info!(
                    token = ticket.token,
                    fetched = reports.len(),
                    nearby = selected.len(),
                    "Nearby reports updated"
                );
                AlertState::Populated { reports: selected }
            }
            Err(err) => {
                let reason = AlertReason::from_error(&err);
                warn!(token = ticket.token, error = %err, %reason, "Nearby refresh failed");
                AlertState::Error(reason)
            }
        };
        true
    }

    /// Requests, fetches and completes a refresh in one go.
    ///
    /// Returns the controller state once this refresh has finished. When a
    /// newer refresh overtook it, that is whatever the newer refresh has
    /// reached so far (possibly still `Loading`), never this refresh's data.
    pub async fn refresh(&self, origin: Option<Coordinate>, radius_km: f64) -> AlertState {
        let Some(source) = self.source.clone() else {
            let mut inner = self.lock();
            inner.latest_token += 1;
            info!("No report source configured");
            inner.state = AlertState::Error(AlertReason::Unavailable);
            return inner.state.clone();
        };

        let Some(ticket) = self.request_refresh(origin, radius_km) else {
            return self.state();
        };
        let outcome = source.fetch_reports_near(ticket.bounds()).await;
        self.complete(&ticket, outcome);
        self.state()
    }

    /// Summary of the current state for display.
    pub fn summary(&self, preview_limit: usize) -> AlertSummary {
        AlertSummary::new(self.lock().state.reports(), preview_limit)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How alarming the nearby count is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing nearby
    Low,
    /// One to three reports
    Medium,
    /// More than three reports
    High,
}

impl Severity {
    /// Severity for `count` nearby reports.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1..=3 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Display-ready digest of the nearby list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    /// Total nearby reports
    pub count: usize,
    /// Severity bucket
    pub severity: Severity,
    /// First few reports, closest first
    pub preview: Vec<RankedReport>,
    /// Reports not in the preview
    pub remaining: usize,
}

impl AlertSummary {
    /// Summarises `reports`, previewing at most `preview_limit`.
    pub fn new(reports: &[RankedReport], preview_limit: usize) -> Self {
        let preview: Vec<_> = reports.iter().take(preview_limit).cloned().collect();
        Self {
            count: reports.len(),
            severity: Severity::from_count(reports.len()),
            remaining: reports.len() - preview.len(),
            preview,
        }
    }
}
