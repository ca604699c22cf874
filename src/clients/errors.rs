//! Error types for REST calls.
//!
//! Every failed call resolves to exactly one [`RestCallError`]. The variants
//! fall into two groups:
//!
//! - [`RestCallError::Api`]: the server rejected the request with a decodable
//!   `{message, statusCode}` body. Callers can branch on the status.
//! - Everything else: transport failures, undecodable error bodies, retry
//!   budget exhaustion and local encode/decode failures. These are treated
//!   as unexpected.
//!
//! # Example
//!
//! ```rust,ignore
//! use resilient_rest::{RestCallError, RestClient};
//!
//! match client.get_resource::<Config>("configs/42").await {
//!     Ok(config) => println!("{config:?}"),
//!     Err(RestCallError::Api(e)) if e.status == 404 => println!("no such config"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use reqwest::header::HeaderMap;
use serde::Deserialize;
use thiserror::Error;

/// Error returned when the server answers with a decodable error body.
///
/// Constructed only for non-2xx, non-429 responses whose body decodes to
/// `{"message": "...", "statusCode": 400}`.
///
/// # Example
///
/// ```rust
/// use resilient_rest::clients::RestApiRequestError;
/// use reqwest::header::HeaderMap;
///
/// let error = RestApiRequestError::new(400, "bad", HeaderMap::new());
/// assert_eq!(error.status, 400);
/// assert_eq!(error.to_string(), "bad");
/// ```
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RestApiRequestError {
    /// The status code reported in the error body.
    pub status: u16,
    /// The error message reported in the error body.
    pub message: String,
    /// Headers of the failed response.
    pub headers: HeaderMap,
}

impl RestApiRequestError {
    /// Creates a new request error.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            status,
            message: message.into(),
            headers,
        }
    }
}

/// Wire shape of an error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
    #[serde(rename = "statusCode")]
    pub(crate) status_code: u16,
}

/// Unified error type for REST calls.
#[derive(Debug, Error)]
pub enum RestCallError {
    /// The server rejected the request with a decodable error body.
    #[error(transparent)]
    Api(#[from] RestApiRequestError),

    /// The request never produced a response (DNS, connection, TLS, ...).
    #[error("Cannot access {url}\n{source}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A non-2xx response whose body is not a decodable error body.
    #[error("Request failed with status {status} {status_text}: {body}")]
    UnexpectedResponse {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase of the status code.
        status_text: String,
        /// The raw response body.
        body: String,
    },

    /// The server kept answering 429 until the retry budget ran out.
    #[error("Rate limit still exceeded after waiting {waited_secs} seconds. Last response: {status} {status_text}")]
    RetryLimitReached {
        /// Whole seconds spent in the call.
        waited_secs: u64,
        /// The last observed status code.
        status: u16,
        /// The last observed reason phrase.
        status_text: String,
        /// Retries made before giving up.
        retries: u32,
    },

    /// The request target could not be turned into a URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A multipart part could not be built.
    #[error("Invalid multipart part '{name}': {source}")]
    Multipart {
        /// The form field name of the part.
        name: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("Failed to read response body from {url}: {source}")]
    Body {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not the expected JSON shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A binary response did not name an attachment filename.
    #[error("Response from {url} has no attachment filename in its Content-Disposition header")]
    MissingFilename {
        /// The URL that was requested.
        url: String,
    },
}

impl RestCallError {
    /// Returns the decodable API error, if this is one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&RestApiRequestError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::UnexpectedResponse { status, .. } | Self::RetryLimitReached { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_message() {
        let error = RestApiRequestError::new(404, "Config not found", HeaderMap::new());
        assert_eq!(error.to_string(), "Config not found");
        assert_eq!(error.status, 404);
    }

    #[test]
    fn test_error_body_decodes_wire_shape() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"bad","statusCode":400,"error":"Bad Request"}"#)
                .unwrap();
        assert_eq!(body.message, "bad");
        assert_eq!(body.status_code, 400);
    }

    #[test]
    fn test_error_body_rejects_other_shapes() {
        assert!(serde_json::from_str::<ErrorBody>(r#"{"error":"nope"}"#).is_err());
        assert!(serde_json::from_str::<ErrorBody>("<html>502</html>").is_err());
    }

    #[test]
    fn test_unexpected_response_embeds_context() {
        let error = RestCallError::UnexpectedResponse {
            status: 502,
            status_text: "Bad Gateway".to_string(),
            body: "<html>upstream down</html>".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("502"));
        assert!(message.contains("Bad Gateway"));
        assert!(message.contains("upstream down"));
        assert_eq!(error.status(), Some(502));
        assert!(error.api_error().is_none());
    }

    #[test]
    fn test_retry_limit_reached_reports_wait() {
        let error = RestCallError::RetryLimitReached {
            waited_secs: 15,
            status: 429,
            status_text: "Too Many Requests".to_string(),
            retries: 4,
        };
        let message = error.to_string();
        assert!(message.contains("15 seconds"));
        assert!(message.contains("429 Too Many Requests"));
    }

    #[test]
    fn test_api_variant_is_transparent() {
        let error: RestCallError = RestApiRequestError::new(400, "bad", HeaderMap::new()).into();
        assert_eq!(error.to_string(), "bad");
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.api_error().map(|e| e.status), Some(400));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let api: &dyn std::error::Error = &RestApiRequestError::new(400, "x", HeaderMap::new());
        let _ = api;
        let call: &dyn std::error::Error = &RestCallError::MissingFilename {
            url: "u".to_string(),
        };
        let _ = call;
    }
}
