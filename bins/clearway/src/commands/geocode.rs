//! Geocode command - place search via Nominatim

use super::{parse_point, print_json};
use crate::OutputFormat;
use anyhow::Result;
use clap::Args;
use clearway_api_client::{ClearwayClient, SearchOptions};
use clearway_cli::output::{format_elapsed, Status};
use clearway_cli::progress;
use clearway_routes::format_distance;
use clearway_telemetry::Timer;
use owo_colors::OwoColorize;

/// Arguments for `clearway geocode`
#[derive(Debug, Args)]
pub struct GeocodeArgs {
    /// Place name or address
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum results
    #[arg(short, long, default_value = "5")]
    pub limit: usize,

    /// Attach distances from this point ("lat,lng")
    #[arg(short, long, allow_hyphen_values = true)]
    pub near: Option<String>,

    /// Search outside the default viewbox too
    #[arg(long)]
    pub unbounded: bool,
}

/// Run geocode command
pub async fn run(args: GeocodeArgs, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");
    let options = SearchOptions {
        limit: args.limit,
        bounded: !args.unbounded,
        origin: args.near.as_deref().map(parse_point).transpose()?,
    };

    let client = ClearwayClient::new()?;
    let spinner = progress::spinner("Searching...");
    let timer = Timer::start("geocode");
    let places = match client.geocoding().search(&query, &options).await {
        Ok(places) => {
            let elapsed = format_elapsed(timer.stop());
            progress::finish_success(&spinner, &format!("Search complete ({elapsed})"));
            places
        }
        Err(e) => {
            progress::finish_error(&spinner, "Search failed");
            return Err(clearway_core::Error::from(e).into());
        }
    };

    if format == OutputFormat::Json {
        return print_json(&places);
    }

    if places.is_empty() {
        Status::warning(&format!("No places found for '{query}'"));
        return Ok(());
    }
    Status::header(&format!("Results for '{query}'"));
    for place in &places {
        let distance = place
            .distance_km
            .map(|d| format!(" · {}", format_distance(d)))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            place.name.bold(),
            format!("[{}]", place.category.as_str()).dimmed(),
            distance
        );
        println!("    {}", place.short_address().dimmed());
    }
    Ok(())
}
