//! Distance command - great-circle distance between two points

use super::{parse_point, print_json};
use crate::OutputFormat;
use anyhow::Result;
use clearway_geo::{distance_km, Coordinate};
use clearway_routes::format_distance;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDistance {
    from: Coordinate,
    to: Coordinate,
    distance_km: f64,
    label: String,
}

/// Run distance command
pub fn run(from: &str, to: &str, format: OutputFormat) -> Result<()> {
    let from = parse_point(from)?;
    let to = parse_point(to)?;
    let km = distance_km(&from, &to);
    let label = format_distance(km);

    match format {
        OutputFormat::Json => print_json(&JsonDistance {
            from,
            to,
            distance_km: km,
            label,
        }),
        OutputFormat::Text => {
            println!("{from} → {to}: {label}");
            Ok(())
        }
    }
}
