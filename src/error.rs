//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. A client can only be constructed from a fully
//! validated [`ClientConfig`](crate::ClientConfig), so no request can be
//! issued against a half-initialized configuration.
//!
//! # Example
//!
//! ```rust
//! use resilient_rest::{BearerToken, ConfigError};
//!
//! let result = BearerToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Bearer token cannot be empty.
    #[error("Bearer token cannot be empty. Please provide a valid API token.")]
    EmptyToken,

    /// Bearer token contains characters that are not allowed in an HTTP header.
    #[error("Bearer token contains characters that cannot be sent in an Authorization header.")]
    InvalidToken,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme and host (e.g., 'https://api.example.com/api/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_error_message() {
        let message = ConfigError::EmptyToken.to_string();
        assert!(message.contains("Bearer token cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("scheme and host"));
    }

    #[test]
    fn test_invalid_token_error_message() {
        let message = ConfigError::InvalidToken.to_string();
        assert!(message.contains("Authorization header"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "token" };
        let message = error.to_string();
        assert!(message.contains("token"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyToken;
        let _: &dyn std::error::Error = &error;
    }
}
