//! # Resilient REST
//!
//! A client-side access layer for a rate-limited REST service: one call
//! executor with predictable retry, backoff and error semantics, and generic
//! CRUD, binary transfer and pagination primitives on top of it.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - [`HttpClient::execute_rest_call`]: sends a request, retries HTTP 429 with
//!   header-driven or exponential backoff, normalizes failures
//! - [`RestClient`]: `get_resource`, `create_resource`, `update_resource`,
//!   `delete_resource`, `upload_data`, `transform_data`,
//!   `get_resource_binary_data`, `call_via_post`, `list_all_resources`
//! - Pure backoff helpers: [`get_rate_limit_from_response`],
//!   [`calculate_waiting_time`], [`retry_limit_reached`]
//!
//! ## Quick Start
//!
//! ```rust
//! use resilient_rest::{BaseUrl, BearerToken, ClientConfig, RestClient, RetryOptions};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/api/v1").unwrap())
//!     .token(BearerToken::new("my-token").unwrap())
//!     .retry_options(RetryOptions::default().max_waiting_time(300))
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(&config);
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use resilient_rest::{RestCallError, RestClient};
//!
//! #[derive(serde::Deserialize)]
//! struct Secret { key: String }
//!
//! let secrets: Vec<Secret> = client.list_all_resources("namespaces/prod/secrets").await?;
//!
//! match client.delete_resource("namespaces/prod/secrets/OLD").await {
//!     Ok(()) => {}
//!     Err(RestCallError::Api(e)) if e.status == 404 => {}
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is immutable and captured by each client
//! - **Fail-fast validation**: newtypes validate on construction
//! - **One normalization point**: every failure comes out of `execute_rest_call`
//!   as a [`RestCallError`]
//! - **Async-first**: designed for the Tokio runtime; dropping a call's future
//!   cancels it, including a pending backoff wait

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, BearerToken, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    calculate_waiting_time, get_rate_limit_from_response, retry_limit_reached, FileData,
    HttpClient, HttpMethod, MultipartPart, PaginatedData, RateLimitInfo, RequestBody,
    RestApiRequestError, RestCallError, RestClient, RestRequest, RetryOptions, RetryState,
    Sleeper, TokioSleeper,
};
