//! Human-readable distance and duration labels.

/// `"12.3km"` from one kilometre up, `"450m"` below. Non-finite input gives
/// an empty label.
#[allow(clippy::cast_possible_truncation)]
pub fn format_distance(distance_km: f64) -> String {
    if !distance_km.is_finite() {
        return String::new();
    }
    if distance_km >= 1.0 {
        format!("{distance_km:.1}km")
    } else {
        format!("{}m", (distance_km.max(0.0) * 1000.0).round() as i64)
    }
}

/// Rounds seconds to whole minutes, then formats as [`format_minutes`] does.
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(duration_sec: f64) -> String {
    if !duration_sec.is_finite() {
        return String::new();
    }
    format_minutes((duration_sec.max(0.0) / 60.0).round() as u64)
}

/// `"45min"` under an hour, `"1h 5min"` from an hour up.
pub fn format_minutes(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h {}min", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}min")
    }
}
