//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::header::HeaderValue;
use std::fmt;

/// A validated API bearer token.
///
/// This newtype ensures the token is non-empty and masks its value in debug
/// output to prevent accidental exposure in logs.
///
/// # Example
///
/// ```rust
/// use resilient_rest::BearerToken;
///
/// let token = BearerToken::new("my-token").unwrap();
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "BearerToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Creates a new validated bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if the token is empty, or
    /// [`ConfigError::InvalidToken`] if it cannot be sent as a header value.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConfigError::InvalidToken)?;
        Ok(Self(token))
    }

    /// Returns the value of the `Authorization` header for this token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(*****)")
    }
}

/// A validated base URL of the remote REST service.
///
/// The URL must carry an `http` or `https` scheme and a host. It may carry a
/// path prefix (e.g. `/api/v1`), which relative request paths are appended to.
/// A trailing slash is trimmed.
///
/// # Example
///
/// ```rust
/// use resilient_rest::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/api/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/api/v1");
/// assert_eq!(url.origin(), "https://api.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    origin_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL cannot be parsed or
    /// does not use an `http`/`https` scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = reqwest::Url::parse(&url)
            .map_err(|_| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        // Origin ends at the first '/' after "scheme://"
        let host_start = url.find("://").map_or(0, |i| i + 3);
        let origin_end = url[host_start..]
            .find(['/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        Ok(Self { url, origin_end })
    }

    /// Returns the scheme, host and port portion of the URL.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.url[..self.origin_end]
    }

    /// Resolves a request target against this base URL.
    ///
    /// - Absolute `http://` / `https://` URLs are returned unchanged.
    /// - Paths starting with `/` are resolved against the origin.
    /// - Anything else is appended to the full base URL.
    #[must_use]
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{target}", self.origin())
        } else if target.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{target}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejects_empty_string() {
        assert!(matches!(BearerToken::new(""), Err(ConfigError::EmptyToken)));
        assert!(matches!(BearerToken::new("   "), Err(ConfigError::EmptyToken)));
    }

    #[test]
    fn test_token_rejects_header_unsafe_characters() {
        for bad in ["abc\ndef", "abc\r\nX-Injected: 1", "tok\u{0}en"] {
            assert!(
                matches!(BearerToken::new(bad), Err(ConfigError::InvalidToken)),
                "expected {bad:?} to be rejected"
            );
        }
        assert!(BearerToken::new("eyJhbGciOi.payload-_~+/=").is_ok());
    }

    #[test]
    fn test_token_masks_value_in_debug() {
        let token = BearerToken::new("super-secret-token").unwrap();
        assert_eq!(format!("{token:?}"), "BearerToken(*****)");
    }

    #[test]
    fn test_token_authorization_header() {
        let token = BearerToken::new("T").unwrap();
        assert_eq!(token.authorization_header(), "Bearer T");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let url = BaseUrl::new("https://api.example.com/api/v1/").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com/api/v1");
    }

    #[test]
    fn test_base_url_origin_keeps_port() {
        let url = BaseUrl::new("http://127.0.0.1:8080/api").unwrap();
        assert_eq!(url.origin(), "http://127.0.0.1:8080");

        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.origin(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_base_url_rejects_invalid_values() {
        for bad in ["", "api.example.com", "ftp://files.example.com", "https://"] {
            assert!(
                matches!(BaseUrl::new(bad), Err(ConfigError::InvalidBaseUrl { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_targets() {
        let url = BaseUrl::new("https://api.example.com/api/v1").unwrap();

        assert_eq!(
            url.resolve("configs"),
            "https://api.example.com/api/v1/configs"
        );
        assert_eq!(
            url.resolve("/api/v1/configs?page=2"),
            "https://api.example.com/api/v1/configs?page=2"
        );
        assert_eq!(
            url.resolve("https://other.example.com/x"),
            "https://other.example.com/x"
        );
        assert_eq!(url.resolve(""), "https://api.example.com/api/v1");
    }
}
