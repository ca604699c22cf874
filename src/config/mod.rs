//! Configuration types for the REST call layer.
//!
//! This module provides the connection parameters every call is made with.
//!
//! # Overview
//!
//! - [`ClientConfig`]: base URL, bearer token, optional transport and retry defaults
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: a validated service base URL
//! - [`BearerToken`]: a validated token with masked debug output
//!
//! There is no process-wide configuration. A config value is built once and
//! captured by the client it is handed to, so two clients with different
//! credentials can be used side by side.
//!
//! # Example
//!
//! ```rust
//! use resilient_rest::{BaseUrl, BearerToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/api/v1").unwrap())
//!     .token(BearerToken::new("my-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, BearerToken};

use crate::clients::RetryOptions;
use crate::error::ConfigError;

/// Connection parameters for the REST call layer.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`. It is immutable once built;
/// in-flight calls can never observe a change to it.
///
/// # Transport
///
/// An optional pre-built [`reqwest::Client`] can be supplied as the transport
/// agent. TLS, proxies and connection pooling are configured on that client,
/// not here.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    token: BearerToken,
    agent: Option<reqwest::Client>,
    retry_options: RetryOptions,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the bearer token.
    #[must_use]
    pub const fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns the transport agent, if one was supplied.
    #[must_use]
    pub const fn agent(&self) -> Option<&reqwest::Client> {
        self.agent.as_ref()
    }

    /// Returns the default retry options used when a call does not override them.
    #[must_use]
    pub const fn retry_options(&self) -> &RetryOptions {
        &self.retry_options
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns a copy of this configuration using a different token.
    #[must_use]
    pub fn with_token(&self, token: BearerToken) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Required fields are `base_url` and `token`.
///
/// # Defaults
///
/// - `agent`: `None` (a rustls-backed client is created)
/// - `retry_options`: [`RetryOptions::default`] (unlimited retries and wait, base 2)
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    token: Option<BearerToken>,
    agent: Option<reqwest::Client>,
    retry_options: Option<RetryOptions>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the bearer token (required).
    #[must_use]
    pub fn token(mut self, token: BearerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the transport agent used to send requests.
    #[must_use]
    pub fn agent(mut self, agent: reqwest::Client) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Sets the default retry options.
    #[must_use]
    pub const fn retry_options(mut self, options: RetryOptions) -> Self {
        self.retry_options = Some(options);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` or `token`
    /// are not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;
        let token = self
            .token
            .ok_or(ConfigError::MissingRequiredField { field: "token" })?;

        Ok(ClientConfig {
            base_url,
            token,
            agent: self.agent,
            retry_options: self.retry_options.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
