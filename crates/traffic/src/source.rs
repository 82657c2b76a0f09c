//! Report source port and an in-memory implementation.

use crate::nearby::filter_within_bounds;
use crate::report::{parse_reports, TrafficReport};
use crate::time::{Clock, SystemClock};
use async_trait::async_trait;
use clearway_core::{Error, Result, ResultExt};
use clearway_geo::Bounds;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Where live reports come from.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Reports inside `bounds` that are still recent enough to show.
    async fn fetch_reports_near(&self, bounds: Bounds) -> Result<Vec<TrafficReport>>;

    /// Every report the source knows about.
    async fn fetch_all_reports(&self) -> Result<Vec<TrafficReport>>;
}

/// Report source backed by a vector, loaded from a JSON export or built in code.
pub struct InMemoryReportSource {
    reports: RwLock<Vec<TrafficReport>>,
    clock: Arc<dyn Clock>,
    max_age_ms: i64,
}

impl std::fmt::Debug for InMemoryReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryReportSource")
            .field("reports", &self.len())
            .field("max_age_ms", &self.max_age_ms)
            .finish_non_exhaustive()
    }
}

impl InMemoryReportSource {
    /// Default age window for bounded fetches.
    pub const DEFAULT_MAX_AGE_MS: i64 = 2 * 60 * 60 * 1000;

    /// Source over `reports`, using the wall clock.
    pub fn new(reports: Vec<TrafficReport>) -> Self {
        Self {
            reports: RwLock::new(reports),
            clock: Arc::new(SystemClock),
            max_age_ms: Self::DEFAULT_MAX_AGE_MS,
        }
    }

    /// Parses a JSON export (array of documents or id-keyed object).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::new(parse_reports(&raw)))
    }

    /// Reads and parses a JSON export file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let context = format!("Reading report export {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(context.as_str())?;
        Self::from_json(&content)
            .context(context)
            .with_suggestion("Export reports as a JSON array or an object keyed by id")
    }

    /// Builder-style method to set the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builder-style method to set the age window for bounded fetches
    #[must_use]
    pub fn with_max_age_ms(mut self, max_age_ms: i64) -> Self {
        self.max_age_ms = max_age_ms;
        self
    }

    /// Adds a report.
    pub fn insert(&self, report: TrafficReport) {
        self.reports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReportSource for InMemoryReportSource {
    async fn fetch_reports_near(&self, bounds: Bounds) -> Result<Vec<TrafficReport>> {
        if !bounds.is_valid() {
            return Err(Error::invalid_input("query bounds are not a valid box"));
        }
        let reports = self.reports.read().unwrap_or_else(PoisonError::into_inner);
        Ok(filter_within_bounds(
            &reports,
            &bounds,
            self.clock.now_ms(),
            self.max_age_ms,
        ))
    }

    async fn fetch_all_reports(&self) -> Result<Vec<TrafficReport>> {
        Ok(self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
