//! Nearby command - proximity alert over a JSON export

use super::{clock_at, parse_point, print_json};
use crate::OutputFormat;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use clearway_cli::output::{report_line, severity_badge, summary_headline, Status};
use clearway_core::config::ClearwayConfig;
use clearway_geo::Coordinate;
use clearway_traffic::{
    AlertState, AlertSummary, Clock, InMemoryReportSource, ProximityAlertController, ReportSource,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for `clearway nearby`
#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// JSON export of reports (array or id-keyed object)
    pub reports: PathBuf,

    /// Your position as "lat,lng" (defaults to nearby.fallback_origin)
    #[arg(short, long, allow_hyphen_values = true)]
    pub origin: Option<String>,

    /// Search radius in km (defaults to nearby.radius_km)
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Reports to preview (defaults to nearby.preview_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Evaluate ages as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNearby<'a> {
    origin: Coordinate,
    radius_km: f64,
    #[serde(flatten)]
    summary: &'a AlertSummary,
}

/// Run nearby command
pub async fn run(args: NearbyArgs, config: &ClearwayConfig, format: OutputFormat) -> Result<()> {
    let origin = match args.origin.as_deref() {
        Some(raw) => parse_point(raw)?,
        None => Coordinate::from(config.nearby.fallback_origin),
    };
    let radius_km = args.radius.unwrap_or(config.nearby.radius_km);
    let limit = args.limit.unwrap_or(config.nearby.preview_limit);
    let clock = clock_at(args.at);

    let source = InMemoryReportSource::from_file(&args.reports)?
        .with_clock(Arc::clone(&clock))
        .with_max_age_ms(config.nearby.max_age_ms());
    tracing::debug!(loaded = source.len(), "Report export loaded");
    let source: Arc<dyn ReportSource> = Arc::new(source);

    let controller =
        ProximityAlertController::from_config(&config.nearby, Some(source)).with_clock(Arc::clone(&clock));
    let state = controller.refresh(Some(origin), radius_km).await;

    if let AlertState::Error(reason) = &state {
        anyhow::bail!("{}", reason.message());
    }
    let summary = controller.summary(limit);

    if format == OutputFormat::Json {
        return print_json(&JsonNearby {
            origin,
            radius_km,
            summary: &summary,
        });
    }

    Status::header(&format!("Nearby reports around {origin}"));
    println!("{} {}", severity_badge(summary.severity), summary_headline(&summary, radius_km));
    let now_ms = clock.now_ms();
    for (i, ranked) in summary.preview.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).dimmed(), report_line(ranked, now_ms));
    }
    if summary.remaining > 0 {
        println!("  {}", format!("+{} more", summary.remaining).dimmed());
    }
    Ok(())
}
