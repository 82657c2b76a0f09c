//! Route command - plan a route with straight-line fallback

use super::{clock_at, parse_point, print_json};
use crate::OutputFormat;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use clearway_api_client::ClearwayClient;
use clearway_cli::output::{format_count, format_elapsed, report_line, route_line, Status};
use clearway_cli::progress;
use clearway_core::config::ClearwayConfig;
use clearway_routes::{RouteFallbackPlanner, RoutePlan, TravelProfile};
use clearway_telemetry::Timer;
use clearway_traffic::{
    select_near_route, Clock, Corridor, InMemoryReportSource, RankedReport, ReportSource,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for `clearway route`
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Start as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub start: String,

    /// Destination as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub end: String,

    /// Plan for walking instead of driving
    #[arg(short, long)]
    pub walking: bool,

    /// Skip the routing service and use the straight-line estimate
    #[arg(long)]
    pub offline: bool,

    /// JSON export of reports to check along the route
    #[arg(short, long)]
    pub reports: Option<PathBuf>,

    /// Evaluate report ages as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRoute<'a> {
    profile: TravelProfile,
    #[serde(flatten)]
    plan: &'a RoutePlan,
    reports_along_route: &'a [RankedReport],
}

/// Run route command
pub async fn run(args: RouteArgs, config: &ClearwayConfig, format: OutputFormat) -> Result<()> {
    let start = parse_point(&args.start)?;
    let end = parse_point(&args.end)?;
    let profile = if args.walking {
        TravelProfile::Walking
    } else {
        TravelProfile::Driving
    };
    let planner = RouteFallbackPlanner::from_config(&config.routing).with_profile(profile);
    let now_ms = clock_at(args.at).now_ms();

    let client = if args.offline {
        None
    } else {
        match ClearwayClient::new() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Routing client unavailable, planning offline");
                Status::warning(&format!("Routing client unavailable ({e}), planning offline"));
                None
            }
        }
    };

    let plan = match client {
        None => planner.plan(None, start, end)?,
        Some(client) => {
            let spinner = progress::spinner("Fetching route...");
            let timer = Timer::start("route");
            let plan = planner.plan_with(&client.routing(), start, end).await;
            let elapsed = format_elapsed(timer.stop());
            match &plan {
                Ok(plan) if plan.used_fallback => progress::finish_warning(
                    &spinner,
                    &format!("Routing unavailable, using straight line ({elapsed})"),
                ),
                Ok(_) => progress::finish_success(&spinner, &format!("Route received ({elapsed})")),
                Err(_) => progress::finish_error(&spinner, "Route request rejected"),
            }
            plan?
        }
    };

    let along_route = match &args.reports {
        Some(path) => {
            let all = InMemoryReportSource::from_file(path)?.fetch_all_reports().await?;
            let corridor = Corridor {
                buffer_deg: config.routing.corridor_buffer_deg,
                radius_km: config.routing.corridor_radius_km,
            };
            select_near_route(&all, &start, &end, corridor, now_ms, config.nearby.max_age_ms())
        }
        None => Vec::new(),
    };

    if format == OutputFormat::Json {
        return print_json(&JsonRoute {
            profile,
            plan: &plan,
            reports_along_route: &along_route,
        });
    }

    Status::header(&format!("{} → {} ({})", start, end, profile.as_str()));
    println!("{}", route_line(0, &plan.primary).bold());
    for (i, alternative) in plan.alternatives.iter().enumerate() {
        println!("{}", route_line(i + 1, alternative));
    }
    if plan.used_fallback {
        Status::warning("Straight-line estimate; actual travel will be longer");
    }

    if args.reports.is_some() {
        Status::header(&format_count(
            along_route.len(),
            "report along the route",
            "reports along the route",
        ));
        for ranked in &along_route {
            println!("  {}", report_line(ranked, now_ms));
        }
    }
    Ok(())
}
