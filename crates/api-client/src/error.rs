//! Error types for the HTTP bindings

use clearway_core::{Error, ErrorCode};
use clearway_geo::GeoError;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required API key is not configured
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Response geometry could not be decoded
    #[error("Invalid route geometry: {0}")]
    Geometry(#[from] GeoError),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// True when the service could not be used at all, as opposed to a
    /// request that reached it and failed
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Config(_) | Self::MissingApiKey(_) | Self::InvalidUrl(_) => true,
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        let code = if err.is_unavailable() {
            ErrorCode::SourceUnavailable
        } else {
            ErrorCode::FetchFailed
        };
        let suggestion = match &err {
            ApiError::MissingApiKey(_) => Some("Set CLEARWAY_ORS_API_KEY"),
            ApiError::ApiResponse { status: 429, .. } => Some("Wait a moment and try again"),
            _ => None,
        };

        let mut converted = Error::new(code, err.to_string());
        if let Some(suggestion) = suggestion {
            converted = converted.with_suggestion(suggestion);
        }
        converted.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert!(ApiError::api_response(404, "nope").is_client_error());
        assert!(ApiError::api_response(503, "down").is_server_error());
        assert!(!ApiError::api_response(503, "down").is_client_error());
    }

    #[test]
    fn test_conversion_to_engine_error() {
        let err: Error = ApiError::MissingApiKey("openrouteservice".into()).into();
        assert_eq!(err.code, ErrorCode::SourceUnavailable);
        assert!(err.suggestion.is_some());

        let err: Error = ApiError::api_response(500, "boom").into();
        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert!(err.message.contains("boom"));
    }
}
