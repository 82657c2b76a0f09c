//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClearwayConfig {
    /// Nearby-report alert settings
    #[serde(default)]
    pub nearby: NearbyConfig,

    /// Map viewport marker settings
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Route planning settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClearwayConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.nearby.radius_km.is_finite() && self.nearby.radius_km > 0.0) {
            return Err(Error::invalid_config_value(
                "nearby.radius_km",
                "must be a positive number",
            ));
        }
        if self.nearby.max_age_minutes == 0 {
            return Err(Error::invalid_config_value(
                "nearby.max_age_minutes",
                "must be greater than zero",
            ));
        }
        let [lat, lng] = self.nearby.fallback_origin;
        if !(lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)) {
            return Err(Error::invalid_config_value(
                "nearby.fallback_origin",
                "must be [lat, lng] within range",
            ));
        }
        if self.viewport.key_decimals > 8 {
            return Err(Error::invalid_config_value(
                "viewport.key_decimals",
                "must be at most 8",
            ));
        }
        for (field, speed) in [
            ("routing.driving_speed_kmh", self.routing.driving_speed_kmh),
            ("routing.walking_speed_kmh", self.routing.walking_speed_kmh),
        ] {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(Error::invalid_config_value(field, "must be a positive number"));
            }
        }
        if !(self.routing.corridor_buffer_deg.is_finite() && self.routing.corridor_buffer_deg >= 0.0) {
            return Err(Error::invalid_config_value(
                "routing.corridor_buffer_deg",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Nearby traffic alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyConfig {
    /// Alert radius around the origin
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Reports older than this drop out of relevance views
    #[serde(default = "default_max_age_minutes")]
    pub max_age_minutes: u64,

    /// How many reports the alert panel previews before "N more"
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// Origin used when the user's location cannot be obtained, `[lat, lng]`
    #[serde(default = "default_fallback_origin")]
    pub fallback_origin: [f64; 2],
}

impl NearbyConfig {
    /// Max age in milliseconds
    #[must_use]
    pub fn max_age_ms(&self) -> i64 {
        i64::try_from(self.max_age_minutes.saturating_mul(60_000)).unwrap_or(i64::MAX)
    }
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            max_age_minutes: default_max_age_minutes(),
            preview_limit: default_preview_limit(),
            fallback_origin: default_fallback_origin(),
        }
    }
}

fn default_radius_km() -> f64 {
    5.0
}

fn default_max_age_minutes() -> u64 {
    120
}

fn default_preview_limit() -> usize {
    5
}

// Vancouver city centre
fn default_fallback_origin() -> [f64; 2] {
    [49.2827, -123.1207]
}

/// Viewport marker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Decimal places used for marker position keys (4 ≈ 11 m)
    #[serde(default = "default_key_decimals")]
    pub key_decimals: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            key_decimals: default_key_decimals(),
        }
    }
}

fn default_key_decimals() -> u32 {
    4
}

/// Route planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Average speed for straight-line driving estimates
    #[serde(default = "default_driving_speed")]
    pub driving_speed_kmh: f64,

    /// Average speed for straight-line walking estimates
    #[serde(default = "default_walking_speed")]
    pub walking_speed_kmh: f64,

    /// Padding added around a route's endpoints when fetching reports
    #[serde(default = "default_corridor_buffer")]
    pub corridor_buffer_deg: f64,

    /// Reports within this distance of either endpoint count as on-route
    #[serde(default = "default_corridor_radius")]
    pub corridor_radius_km: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            driving_speed_kmh: default_driving_speed(),
            walking_speed_kmh: default_walking_speed(),
            corridor_buffer_deg: default_corridor_buffer(),
            corridor_radius_km: default_corridor_radius(),
        }
    }
}

fn default_driving_speed() -> f64 {
    50.0
}

fn default_walking_speed() -> f64 {
    5.0
}

fn default_corridor_buffer() -> f64 {
    0.1
}

fn default_corridor_radius() -> f64 {
    5.0
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
