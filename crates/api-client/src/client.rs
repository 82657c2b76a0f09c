//! Shared HTTP client

use crate::config::ClientConfig;
use crate::endpoints::{NominatimClient, OrsRoutingClient};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client shared by the routing and geocoding bindings
///
/// Wraps `reqwest` with a configured timeout, identifying headers and
/// request correlation IDs. Cheap to clone.
#[derive(Clone)]
pub struct ClearwayClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl ClearwayClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config(format!("invalid user agent: {}", config.user_agent)))?;
        default_headers.insert(USER_AGENT, user_agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Routing via OpenRouteService
    #[must_use]
    pub fn routing(&self) -> OrsRoutingClient {
        OrsRoutingClient::new(self.clone())
    }

    /// Geocoding via Nominatim
    #[must_use]
    pub fn geocoding(&self) -> NominatimClient {
        NominatimClient::new(self.clone())
    }

    /// Perform a GET request with query parameters
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get_json<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
    ) -> ApiResult<T> {
        let request = self.inner.request(Method::GET, url).query(query);
        self.execute(url, request).await
    }

    /// Perform a POST request with a JSON body
    #[instrument(skip(self, body, headers), fields(request_id))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ApiResult<T> {
        let request = self.inner.request(Method::POST, url).headers(headers).json(body);
        self.execute(url, request).await
    }

    async fn execute<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = match request.header(X_REQUEST_ID, &request_id).send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => Err(ApiError::Request(e)),
        };
        let elapsed_ms = start.elapsed().as_millis();

        match &result {
            Ok(_) => debug!(request_id = %request_id, url = %url, elapsed_ms, "Request succeeded"),
            Err(e) => warn!(
                request_id = %request_id,
                url = %url,
                elapsed_ms,
                error = %e,
                "Request failed"
            ),
        }
        result
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

impl std::fmt::Debug for ClearwayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClearwayClient")
            .field("ors_url", &self.config.ors_url)
            .field("nominatim_url", &self.config.nominatim_url)
            .field("has_ors_key", &self.config.ors_api_key.is_some())
            .finish_non_exhaustive()
    }
}
