//! HTTP client types for the REST call layer.
//!
//! # Overview
//!
//! - [`HttpClient`]: the call executor, with rate-limit retries
//! - [`RestRequest`]: method, headers and [`RequestBody`] of a call
//! - [`RetryOptions`] / [`RetryState`]: the retry budget and its progress
//! - [`RestCallError`] / [`RestApiRequestError`]: the failure taxonomy
//! - [`rest::RestClient`]: generic resource primitives
//!
//! # Retry Behavior
//!
//! Only HTTP 429 is retried:
//!
//! - **429 (Rate Limited)**: waits `ratelimit-reset` seconds if the header is
//!   present, otherwise `exponential_base ^ retry` seconds (capped at
//!   `max_waiting_time` when set), then resends
//! - **Transport failures**: returned immediately as [`RestCallError::Transport`]
//! - **Other non-2xx**: returned immediately as [`RestCallError::Api`] or
//!   [`RestCallError::UnexpectedResponse`]
//!
//! With the default [`RetryOptions`] there is no retry or time limit; set
//! `retry_limit` or `max_waiting_time` to bound the loop.

mod backoff;
mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use backoff::{
    calculate_waiting_time, get_rate_limit_from_response, retry_limit_reached, RetryOptions,
    RetryState, Sleeper, TokioSleeper, DEFAULT_EXPONENTIAL_BASE, RATELIMIT_RESET_HEADER,
};
pub use errors::{RestApiRequestError, RestCallError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, MultipartPart, RequestBody, RestRequest, RestRequestBuilder};
pub use http_response::{
    attachment_filename, parse_content_disposition, RateLimitInfo, RATELIMIT_LIMIT_HEADER,
    RATELIMIT_REMAINING_HEADER,
};

// Re-export resource client types at the clients module level
pub use rest::{FileData, PaginatedData, RestClient};
