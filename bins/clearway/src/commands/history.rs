//! History command - past reports by time window and type

use super::{clock_at, print_json};
use crate::OutputFormat;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use clearway_cli::output::{format_count, Status};
use clearway_traffic::{
    filter_history, time_ago, Clock, HistoryWindow, InMemoryReportSource, ReportSource, ReportType,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Arguments for `clearway history`
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// JSON export of reports (array or id-keyed object)
    pub reports: PathBuf,

    /// Time window: day, week, month or all
    #[arg(short, long, default_value = "day", conflicts_with_all = ["from", "to"])]
    pub window: HistoryWindow,

    /// First day of a custom range (YYYY-MM-DD, UTC)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of a custom range (YYYY-MM-DD, UTC)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Only this report type (accident, traffic, roadblock, construction)
    #[arg(short = 't', long = "type")]
    pub report_type: Option<String>,

    /// Maximum reports to print
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Evaluate windows as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Run history command
pub async fn run(args: HistoryArgs, format: OutputFormat) -> Result<()> {
    let window = match (args.from, args.to) {
        (Some(from), Some(to)) => HistoryWindow::custom(from, to)?,
        _ => args.window,
    };
    let report_type = args.report_type.as_deref().map(ReportType::parse);
    let now_ms = clock_at(args.at).now_ms();

    let source = InMemoryReportSource::from_file(&args.reports)?;
    let all = source.fetch_all_reports().await?;
    let mut matching = filter_history(&all, window, report_type, now_ms);
    let total = matching.len();
    matching.truncate(args.limit);

    if format == OutputFormat::Json {
        return print_json(&matching);
    }

    Status::header(&format!("{} in window", format_count(total, "report", "reports")));
    for report in &matching {
        let age = time_ago(report.created_at_ms, now_ms);
        println!(
            "  {:<12} {:<10} {} {}",
            report.report_type.label(),
            if age.is_empty() { "-".to_string() } else { age },
            report.coordinate().dimmed(),
            report.comment
        );
    }
    if total > matching.len() {
        println!("  {}", format!("+{} more", total - matching.len()).dimmed());
    }
    Ok(())
}
