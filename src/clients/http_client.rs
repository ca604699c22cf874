//! Rate-limit aware call executor.
//!
//! This module provides [`HttpClient`], whose
//! [`execute_rest_call`](HttpClient::execute_rest_call) is the single place
//! where requests hit the network, 429 responses are retried, and every
//! failure is normalized into a [`RestCallError`].

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::time::Instant;

use crate::clients::backoff::{
    calculate_waiting_time, retry_limit_reached, RetryOptions, Sleeper, TokioSleeper,
};
use crate::clients::errors::{ErrorBody, RestApiRequestError, RestCallError};
use crate::clients::http_request::{RequestBody, RestRequest};
use crate::clients::http_response::{status_text, RateLimitInfo};
use crate::config::{BaseUrl, BearerToken, ClientConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Executes REST calls with rate-limit retries.
///
/// The client handles:
/// - Target resolution against the configured base URL
/// - Default headers (`Authorization: Bearer <token>`, `User-Agent`)
/// - Body encoding for JSON and multipart requests
/// - Retrying 429 responses with header-driven or exponential backoff
/// - Normalizing failed responses into [`RestCallError`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to clone; clones share the
/// underlying connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use resilient_rest::clients::{HttpClient, HttpMethod, RestRequest};
/// use resilient_rest::RetryOptions;
///
/// let client = HttpClient::new(&config);
/// let request = RestRequest::builder(HttpMethod::Get).build();
///
/// let response = client
///     .execute_rest_call("namespaces", &request, RetryOptions::default().retry_limit(5))
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The transport used to send requests.
    client: reqwest::Client,
    /// Base URL that relative targets are resolved against.
    base_url: BaseUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Retry options used by callers that do not pass their own.
    retry_options: RetryOptions,
    /// Suspends the retry loop between attempts.
    sleeper: Arc<dyn Sleeper>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// The configured transport agent is used when present; otherwise a
    /// default rustls-backed [`reqwest::Client`] is created.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}resilient-rest v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert(
            "Authorization".to_string(),
            config.token().authorization_header(),
        );

        let client = config.agent().cloned().unwrap_or_default();

        Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            retry_options: *config.retry_options(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Returns a client that shares this client's transport but
    /// authenticates with a different token.
    #[must_use]
    pub fn with_token(&self, token: &BearerToken) -> Self {
        let mut client = self.clone();
        client
            .default_headers
            .insert("Authorization".to_string(), token.authorization_header());
        client
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the retry options used when a call does not override them.
    #[must_use]
    pub const fn retry_options(&self) -> &RetryOptions {
        &self.retry_options
    }

    /// Resolves a request target into an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`RestCallError::InvalidUrl`] if the result is not a valid URL.
    pub fn resolve_url(&self, target: &str) -> Result<String, RestCallError> {
        let url = self.base_url.resolve(target);
        reqwest::Url::parse(&url).map_err(|e| RestCallError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(url)
    }

    /// Sends a request, retrying while the server answers 429.
    ///
    /// Returns the first 2xx response with its body unread.
    ///
    /// # Errors
    ///
    /// - [`RestCallError::Transport`] if the request could not be sent (never retried)
    /// - [`RestCallError::RetryLimitReached`] if 429s outlast `options`
    /// - [`RestCallError::Api`] for other failures with a `{message, statusCode}` body
    /// - [`RestCallError::UnexpectedResponse`] for other failures with any other body
    pub async fn execute_rest_call(
        &self,
        target: &str,
        request: &RestRequest,
        options: RetryOptions,
    ) -> Result<reqwest::Response, RestCallError> {
        let url = self.resolve_url(target)?;
        let started = Instant::now();
        let mut retry_count: u32 = 0;

        loop {
            tracing::debug!(
                method = %request.method,
                url = %url,
                retry = retry_count,
                "Sending request"
            );

            let response = self.send(&url, request).await?;
            let status = response.status();

            if let Some(info) = RateLimitInfo::from_headers(response.headers()) {
                tracing::debug!(
                    limit = ?info.limit,
                    remaining = ?info.remaining,
                    reset = ?info.reset,
                    "Rate limit status for {}",
                    url
                );
            }

            if status.is_success() {
                return Ok(response);
            }

            if status != StatusCode::TOO_MANY_REQUESTS {
                return Err(Self::error_from_response(&url, response).await);
            }

            let state = options.state(retry_count, started.elapsed());
            if retry_limit_reached(&state) {
                return Err(RestCallError::RetryLimitReached {
                    waited_secs: state.passed_time.as_secs(),
                    status: status.as_u16(),
                    status_text: status_text(status),
                    retries: retry_count,
                });
            }

            let wait = calculate_waiting_time(response.headers(), &state);
            drop(response);
            tracing::warn!(
                "Rate limited by {}, retrying in {} seconds (retry {})",
                url,
                wait,
                retry_count + 1
            );

            self.sleeper.wait(wait).await;
            retry_count += 1;
        }
    }

    /// Builds and sends one attempt of the request.
    async fn send(
        &self,
        url: &str,
        request: &RestRequest,
    ) -> Result<reqwest::Response, RestCallError> {
        let mut req_builder = self.client.request(request.method.as_reqwest(), url);

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(content_type) = request.body.content_type() {
            req_builder = req_builder.header("Content-Type", content_type);
        }
        for (key, value) in &request.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        req_builder = match &request.body {
            RequestBody::None => req_builder,
            RequestBody::Json(value) => {
                req_builder.body(serde_json::to_vec(value).map_err(RestCallError::Encode)?)
            }
            RequestBody::Multipart(parts) => req_builder.multipart(RequestBody::to_form(parts)?),
        };

        req_builder
            .send()
            .await
            .map_err(|source| RestCallError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Turns a failed, non-429 response into an error.
    async fn error_from_response(url: &str, response: reqwest::Response) -> RestCallError {
        let status = response.status();
        let headers = response.headers().clone();

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                return RestCallError::Body {
                    url: url.to_string(),
                    source,
                }
            }
        };

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => {
                RestApiRequestError::new(error.status_code, error.message, headers).into()
            }
            Err(_) => RestCallError::UnexpectedResponse {
                status: status.as_u16(),
                status_text: status_text(status),
                body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;

    fn create_test_config() -> ClientConfig {
        ClientConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com/api/v1").unwrap())
            .token(BearerToken::new("test-token").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_authorization_header_injection() {
        let client = HttpClient::new(&create_test_config());
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer test-token".to_string())
        );
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config());
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("resilient-rest v"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .token(BearerToken::new("t").unwrap())
            .user_agent_prefix("flowctl/2.1")
            .build()
            .unwrap();
        let client = HttpClient::new(&config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("flowctl/2.1 | resilient-rest v"));
    }

    #[test]
    fn test_with_token_swaps_authorization_only() {
        let client = HttpClient::new(&create_test_config());
        let other = client.with_token(&BearerToken::new("other-token").unwrap());

        assert_eq!(
            other.default_headers().get("Authorization"),
            Some(&"Bearer other-token".to_string())
        );
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer test-token".to_string())
        );
        assert_eq!(other.base_url(), client.base_url());
    }

    #[test]
    fn test_resolve_url() {
        let client = HttpClient::new(&create_test_config());
        assert_eq!(
            client.resolve_url("configs").unwrap(),
            "https://api.example.com/api/v1/configs"
        );
        assert!(matches!(
            client.resolve_url("http://exa mple.com"),
            Err(RestCallError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_retry_options_come_from_config() {
        let config = ClientConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .token(BearerToken::new("t").unwrap())
            .retry_options(RetryOptions::default().retry_limit(7))
            .build()
            .unwrap();
        let client = HttpClient::new(&config);
        assert_eq!(client.retry_options().retry_limit, 7);
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
