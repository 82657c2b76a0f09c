//! Configuration for the ClearWay HTTP bindings
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default OpenRouteService endpoint
const DEFAULT_ORS_URL: &str = "https://api.openrouteservice.org";

/// Default Nominatim endpoint
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default User-Agent; Nominatim's usage policy requires one that identifies the app
const DEFAULT_USER_AGENT: &str = "ClearWay/1.0";

/// Metro Vancouver, `min_lng,min_lat,max_lng,max_lat`
const DEFAULT_VIEWBOX: [f64; 4] = [-123.3, 49.2, -123.0, 49.3];

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OpenRouteService base URL
    pub ors_url: String,
    /// OpenRouteService API key; routing is unavailable without one
    pub ors_api_key: Option<String>,
    /// Nominatim base URL
    pub nominatim_url: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// ISO country codes geocoding results are restricted to, comma separated
    pub country_codes: Option<String>,
    /// Geocoding bias box, `[min_lng, min_lat, max_lng, max_lat]`
    pub viewbox: Option<[f64; 4]>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ors_url: DEFAULT_ORS_URL.to_string(),
            ors_api_key: None,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: Some("ca".to_string()),
            viewbox: Some(DEFAULT_VIEWBOX),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `CLEARWAY_ORS_API_KEY` or `ORS_API_KEY`: OpenRouteService key
    /// - `CLEARWAY_ORS_URL`: OpenRouteService base URL
    /// - `CLEARWAY_NOMINATIM_URL`: Nominatim base URL
    /// - `CLEARWAY_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let defaults = Self::default();

        let ors_api_key = env::var("CLEARWAY_ORS_API_KEY")
            .or_else(|_| env::var("ORS_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let ors_url = env::var("CLEARWAY_ORS_URL").unwrap_or(defaults.ors_url);
        let nominatim_url = env::var("CLEARWAY_NOMINATIM_URL").unwrap_or(defaults.nominatim_url);

        let timeout = match env::var("CLEARWAY_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::config(format!("CLEARWAY_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => defaults.timeout,
        };

        let config = Self {
            ors_url,
            ors_api_key,
            nominatim_url,
            timeout,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set the OpenRouteService URL
    #[must_use]
    pub fn with_ors_url(mut self, url: impl Into<String>) -> Self {
        self.ors_url = url.into();
        self
    }

    /// Builder-style method to set the OpenRouteService API key
    #[must_use]
    pub fn with_ors_api_key(mut self, key: impl Into<String>) -> Self {
        self.ors_api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the Nominatim URL
    #[must_use]
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the geocoding country filter
    #[must_use]
    pub fn with_country_codes(mut self, codes: Option<String>) -> Self {
        self.country_codes = codes;
        self
    }

    /// Builder-style method to set the geocoding bias box
    #[must_use]
    pub fn with_viewbox(mut self, viewbox: Option<[f64; 4]>) -> Self {
        self.viewbox = viewbox;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [("ors_url", &self.ors_url), ("nominatim_url", &self.nominatim_url)] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{name} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::InvalidUrl(format!(
                    "{name} must start with http:// or https://, got {url}"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if let Some([min_lng, min_lat, max_lng, max_lat]) = self.viewbox {
            if !(min_lng < max_lng && min_lat < max_lat) {
                return Err(ApiError::config("viewbox must be [min_lng, min_lat, max_lng, max_lat]"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.ors_url.contains("openrouteservice"));
        assert!(config.ors_api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_ors_url("http://localhost:8080/ors")
            .with_ors_api_key("secret")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.ors_url, "http://localhost:8080/ors");
        assert_eq!(config.ors_api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().with_ors_url("").validate().is_err());
        assert!(matches!(
            ClientConfig::default().with_nominatim_url("ftp://x").validate(),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_viewbox(Some([-123.0, 49.3, -123.3, 49.2]))
            .validate()
            .is_err());
    }
}
