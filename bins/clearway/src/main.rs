//! ClearWay CLI - nearby traffic alerts and route planning
//!
//! Works against a JSON export of community reports and the public
//! OpenRouteService and Nominatim APIs.

use clap::{Parser, Subcommand, ValueEnum};
use clearway_cli::output::Status;
use clearway_core::config::Config;
use clearway_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{distance, geocode, history, key, nearby, route};

/// Nearby traffic alerts and route planning
#[derive(Parser)]
#[command(name = "clearway")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .clearway.toml / clearway.toml)
    #[arg(short, long, global = true, env = "CLEARWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write JSON logs to daily files in this directory
    #[arg(long, global = true, env = "CLEARWAY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    Distance {
        /// First point as "lat,lng"
        #[arg(allow_hyphen_values = true)]
        from: String,
        /// Second point as "lat,lng"
        #[arg(allow_hyphen_values = true)]
        to: String,
    },

    /// Reports near a point, closest first
    Nearby(nearby::NearbyArgs),

    /// Browse past reports by time window and type
    History(history::HistoryArgs),

    /// Plan a route, falling back to a straight line when offline
    Route(route::RouteArgs),

    /// Search for places by name or address
    Geocode(geocode::GeocodeArgs),

    /// Marker and favorite keys for a point
    Key {
        /// Point as "lat,lng"
        #[arg(allow_hyphen_values = true)]
        point: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::engine_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let mut telemetry = TelemetryConfig::from(&config.schema.logging);
    if cli.verbose {
        telemetry = telemetry.with_level("debug");
    }
    if let Some(dir) = &cli.log_dir {
        telemetry = telemetry.with_log_dir(dir);
    }
    let _guard = match clearway_telemetry::init_with_config(telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let settings = &config.schema;
    let result = match cli.command {
        Commands::Distance { from, to } => distance::run(&from, &to, cli.format),
        Commands::Nearby(args) => nearby::run(args, settings, cli.format).await,
        Commands::History(args) => history::run(args, cli.format).await,
        Commands::Route(args) => route::run(args, settings, cli.format).await,
        Commands::Geocode(args) => geocode::run(args, cli.format).await,
        Commands::Key { point } => key::run(&point, settings, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<clearway_core::Error>() {
                Some(engine) if cli.format == OutputFormat::Json => {
                    match serde_json::to_string(&engine.to_report()) {
                        Ok(report) => eprintln!("{report}"),
                        Err(_) => Status::engine_error(engine),
                    }
                }
                Some(engine) => Status::engine_error(engine),
                None => eprintln!("{} {:#}", "Error:".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}
