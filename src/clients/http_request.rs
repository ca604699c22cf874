//! Request shape for REST calls.
//!
//! A [`RestRequest`] describes everything about a call except its URL: the
//! method, extra headers and a [`RequestBody`]. The body is a tagged variant
//! so that JSON, multipart and empty bodies all flow through the same
//! execution path in [`HttpClient`](crate::clients::HttpClient).

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::RestCallError;

/// HTTP methods used by the resource primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET, for reading resources.
    Get,
    /// HTTP POST, for creating resources and triggering actions.
    Post,
    /// HTTP PATCH, for partial updates.
    Patch,
    /// HTTP DELETE, for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the matching [`reqwest::Method`].
    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One field of a multipart form.
///
/// Parts own their data so the form can be rebuilt for every retry attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartPart {
    /// A plain text field.
    Text {
        /// Form field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file field.
    File {
        /// Form field name.
        name: String,
        /// File name sent with the part.
        filename: String,
        /// MIME type of the file, if known.
        content_type: Option<String>,
        /// File contents.
        data: Vec<u8>,
    },
}

impl MultipartPart {
    /// Creates a text part.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a file part.
    #[must_use]
    pub fn file(name: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            filename: filename.into(),
            content_type: None,
            data,
        }
    }

    /// Sets the MIME type of a file part. Text parts are returned unchanged.
    #[must_use]
    pub fn with_content_type(self, mime: impl Into<String>) -> Self {
        match self {
            Self::File {
                name,
                filename,
                data,
                ..
            } => Self::File {
                name,
                filename,
                content_type: Some(mime.into()),
                data,
            },
            text @ Self::Text { .. } => text,
        }
    }

    /// Returns the form field name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Body of a REST request.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// A JSON document, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// A multipart form. The transport sets `Content-Type` and the boundary.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Serializes a value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RestCallError::Encode`] if the value cannot be serialized.
    pub fn json<B: serde::Serialize + ?Sized>(body: &B) -> Result<Self, RestCallError> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(RestCallError::Encode)
    }

    /// Returns the `Content-Type` this body must be sent with, if any.
    ///
    /// Multipart bodies return `None`: the boundary is chosen by the transport.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some("application/json"),
            Self::None | Self::Multipart(_) => None,
        }
    }

    /// Builds a fresh multipart form from the parts.
    pub(crate) fn to_form(
        parts: &[MultipartPart],
    ) -> Result<reqwest::multipart::Form, RestCallError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let mut file_part =
                        reqwest::multipart::Part::bytes(data.clone()).file_name(filename.clone());
                    if let Some(mime) = content_type {
                        file_part = file_part.mime_str(mime).map_err(|source| {
                            RestCallError::Multipart {
                                name: name.clone(),
                                source,
                            }
                        })?;
                    }
                    form.part(name.clone(), file_part)
                }
            };
        }
        Ok(form)
    }
}

/// A request to be sent by [`HttpClient`](crate::clients::HttpClient).
///
/// # Example
///
/// ```rust
/// use resilient_rest::clients::{HttpMethod, RequestBody, RestRequest};
/// use serde_json::json;
///
/// let request = RestRequest::builder(HttpMethod::Post)
///     .body(RequestBody::Json(json!({"name": "nightly"})))
///     .header("X-Request-Source", "cli")
///     .build();
///
/// assert_eq!(request.method, HttpMethod::Post);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RestRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The request body.
    pub body: RequestBody,
    /// Headers sent in addition to the client's default headers.
    pub extra_headers: HashMap<String, String>,
}

impl RestRequest {
    /// Creates a new builder for the given method.
    #[must_use]
    pub fn builder(method: HttpMethod) -> RestRequestBuilder {
        RestRequestBuilder::new(method)
    }
}

/// Builder for [`RestRequest`].
#[derive(Debug)]
pub struct RestRequestBuilder {
    method: HttpMethod,
    body: RequestBody,
    extra_headers: HashMap<String, String>,
}

impl RestRequestBuilder {
    fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: RequestBody::None,
            extra_headers: HashMap::new(),
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Builds the [`RestRequest`].
    #[must_use]
    pub fn build(self) -> RestRequest {
        RestRequest {
            method: self.method,
            body: self.body,
            extra_headers: self.extra_headers,
        }
    }
}
