//! Key command - position keys used for markers and favorites

use super::{parse_point, print_json};
use crate::OutputFormat;
use anyhow::{Context, Result};
use clearway_core::config::ClearwayConfig;
use clearway_geo::PositionKey;
use clearway_routes::build_key;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonKeys {
    marker: String,
    favorite: String,
}

/// Run key command
pub fn run(point: &str, config: &ClearwayConfig, format: OutputFormat) -> Result<()> {
    let point = parse_point(point)?;
    let marker = PositionKey::new(&point, config.viewport.key_decimals)
        .context("Point has no marker key")?
        .into_string();
    let favorite = build_key(point.lat, point.lng);

    match format {
        OutputFormat::Json => print_json(&JsonKeys { marker, favorite }),
        OutputFormat::Text => {
            println!("marker:   {marker}");
            println!("favorite: {favorite}");
            Ok(())
        }
    }
}
