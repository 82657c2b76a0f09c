//! Report history browsing: time windows and type filters.

use crate::report::{ReportType, TrafficReport};
use chrono::NaiveDate;
use clearway_core::{Error, Result};
use std::str::FromStr;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Longest custom range, in days.
pub const MAX_CUSTOM_RANGE_DAYS: i64 = 30;

/// Time window for browsing past reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryWindow {
    /// Last 24 hours
    #[default]
    Day,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Inclusive calendar-day range in UTC
    Custom {
        /// First instant of the start day
        start_ms: i64,
        /// Last millisecond of the end day
        end_ms: i64,
    },
    /// No time restriction
    All,
}

impl HistoryWindow {
    /// Custom window covering `start` through `end`, whole days in UTC.
    ///
    /// Rejects inverted ranges and ranges longer than
    /// [`MAX_CUSTOM_RANGE_DAYS`].
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::validation("start date is later than end date")
                .with_context(format!("{start} > {end}")));
        }
        let days = (end - start).num_days();
        if days > MAX_CUSTOM_RANGE_DAYS {
            return Err(Error::validation("custom date range cannot exceed one month")
                .with_context(format!("{days} days requested"))
                .with_suggestion(format!("Pick at most {MAX_CUSTOM_RANGE_DAYS} days")));
        }

        let start_ms = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
        let end_ms = end
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|dt| dt.and_utc().timestamp_millis());
        match (start_ms, end_ms) {
            (Some(start_ms), Some(end_ms)) => Ok(Self::Custom { start_ms, end_ms }),
            _ => Err(Error::validation("date out of range")),
        }
    }

    /// True if a report created at `created_at_ms` falls in the window.
    ///
    /// Undated reports only pass [`HistoryWindow::All`].
    pub fn contains(&self, created_at_ms: Option<i64>, now_ms: i64) -> bool {
        let Some(created) = created_at_ms else {
            return matches!(self, Self::All);
        };
        let age = now_ms.saturating_sub(created);
        match *self {
            Self::Day => age <= DAY_MS,
            Self::Week => age <= 7 * DAY_MS,
            Self::Month => age <= 30 * DAY_MS,
            Self::Custom { start_ms, end_ms } => (start_ms..=end_ms).contains(&created),
            Self::All => true,
        }
    }
}

impl FromStr for HistoryWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1day" | "day" => Ok(Self::Day),
            "1week" | "week" => Ok(Self::Week),
            "1month" | "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(Error::invalid_input(format!("unknown history window '{other}'"))
                .with_suggestion("Use one of: day, week, month, all")),
        }
    }
}

/// Reports matching `window` and, if given, `report_type`, newest first.
///
/// Undated reports sort last.
pub fn filter_history(
    reports: &[TrafficReport],
    window: HistoryWindow,
    report_type: Option<ReportType>,
    now_ms: i64,
) -> Vec<TrafficReport> {
    let mut matching: Vec<TrafficReport> = reports
        .iter()
        .filter(|r| window.contains(r.created_at_ms, now_ms))
        .filter(|r| report_type.is_none_or(|t| r.report_type == t))
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_709_294_400_000; // 2024-03-01T12:00:00Z

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rolling_windows() {
        assert!(HistoryWindow::Day.contains(Some(NOW - DAY_MS), NOW));
        assert!(!HistoryWindow::Day.contains(Some(NOW - DAY_MS - 1), NOW));
        assert!(HistoryWindow::Week.contains(Some(NOW - 3 * DAY_MS), NOW));
        assert!(HistoryWindow::Month.contains(Some(NOW - 30 * DAY_MS), NOW));
        assert!(!HistoryWindow::Month.contains(None, NOW));
        assert!(HistoryWindow::All.contains(None, NOW));
    }

    #[test]
    fn test_custom_covers_whole_days() {
        let window = HistoryWindow::custom(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert!(window.contains(Some(1_709_251_200_000), NOW));
        assert!(window.contains(Some(1_709_251_200_000 + DAY_MS - 1), NOW));
        assert!(!window.contains(Some(1_709_251_200_000 + DAY_MS), NOW));
        assert!(!window.contains(Some(1_709_251_200_000 - 1), NOW));
    }

    #[test]
    fn test_custom_range_limits() {
        assert!(HistoryWindow::custom(date(2024, 1, 1), date(2024, 1, 31)).is_ok());
        assert!(HistoryWindow::custom(date(2024, 1, 1), date(2024, 2, 1)).is_err());
        let err = HistoryWindow::custom(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_filter_history_by_type_newest_first() {
        let reports = [
            TrafficReport::new("old", 1.0, 1.0)
                .with_type(ReportType::Accident)
                .with_created_at(NOW - 2 * 60_000),
            TrafficReport::new("jam", 1.0, 1.0)
                .with_type(ReportType::Traffic)
                .with_created_at(NOW - 60_000),
            TrafficReport::new("new", 1.0, 1.0)
                .with_type(ReportType::Accident)
                .with_created_at(NOW),
            TrafficReport::new("ancient", 1.0, 1.0)
                .with_type(ReportType::Accident)
                .with_created_at(NOW - 2 * DAY_MS),
        ];
        let ids: Vec<_> = filter_history(&reports, HistoryWindow::Day, Some(ReportType::Accident), NOW)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["new", "old"]);

        assert_eq!(filter_history(&reports, HistoryWindow::All, None, NOW).len(), 4);
    }

    #[test]
    fn test_parse_window() {
        assert_eq!("1week".parse::<HistoryWindow>().unwrap(), HistoryWindow::Week);
        assert_eq!("all".parse::<HistoryWindow>().unwrap(), HistoryWindow::All);
        assert!("fortnight".parse::<HistoryWindow>().is_err());
    }
}
