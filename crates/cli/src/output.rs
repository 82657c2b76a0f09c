//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. The `*_line` helpers return
//! plain strings so callers decide where they go.

use clearway_core::Error;
use clearway_routes::{format_distance, format_duration, RouteGeometry};
use clearway_traffic::report::ANONYMOUS;
use clearway_traffic::{time_ago, AlertSummary, RankedReport, Severity};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print an engine error with its code and suggestion
    pub fn engine_error(error: &Error) {
        eprintln!(
            "{} {} {}",
            "✗".red(),
            format!("[E{}]", error.code.code()).dimmed(),
            error.message
        );
        if let Some(context) = &error.context {
            eprintln!("  {}", context.dimmed());
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  {} {}", "hint:".cyan(), suggestion);
        }
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Coloured severity tag
pub fn severity_badge(severity: Severity) -> String {
    match severity {
        Severity::Low => "LOW".green().to_string(),
        Severity::Medium => "MEDIUM".yellow().to_string(),
        Severity::High => "HIGH".red().bold().to_string(),
    }
}

/// One-line headline for a nearby summary
pub fn summary_headline(summary: &AlertSummary, radius_km: f64) -> String {
    if summary.count == 0 {
        return format!("All clear within {}", format_distance(radius_km));
    }
    format!(
        "{} within {}",
        format_count(summary.count, "report", "reports"),
        format_distance(radius_km)
    )
}

/// `Accident · 350m · 12 min ago · by dana · "left lane blocked"`
pub fn report_line(ranked: &RankedReport, now_ms: i64) -> String {
    let report = &ranked.report;
    let mut parts = vec![
        report.report_type.label().to_string(),
        format_distance(ranked.distance_km),
    ];
    let age = time_ago(report.created_at_ms, now_ms);
    if !age.is_empty() {
        parts.push(age);
    }
    if report.username != ANONYMOUS {
        parts.push(format!("by {}", report.username));
    }
    if !report.comment.is_empty() {
        parts.push(format!("\"{}\"", report.comment));
    }
    parts.join(" · ")
}

/// `Route 2: 12.3km, 17min`
pub fn route_line(index: usize, route: &RouteGeometry) -> String {
    format!(
        "Route {}: {}, {}",
        index + 1,
        format_distance(route.distance_km),
        format_duration(route.duration_sec)
    )
}

/// Format an elapsed wall-clock duration for display
pub fn format_elapsed(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
