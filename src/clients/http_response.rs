//! Response header helpers.
//!
//! Successful calls hand back the raw [`reqwest::Response`]; this module
//! holds the parsing that the resource primitives and callers apply to its
//! headers: rate-limit quota information and attachment filenames.

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};

use crate::clients::backoff::{parse_leading_integer, RATELIMIT_RESET_HEADER};

/// Header carrying the request quota of the current window.
pub const RATELIMIT_LIMIT_HEADER: &str = "ratelimit-limit";

/// Header carrying the requests left in the current window.
pub const RATELIMIT_REMAINING_HEADER: &str = "ratelimit-remaining";

/// Rate limit information parsed from the `RateLimit-*` response headers.
///
/// Each field is parsed with the same lenient leading-integer rule as
/// [`get_rate_limit_from_response`](crate::clients::get_rate_limit_from_response).
///
/// # Example
///
/// ```rust
/// use resilient_rest::clients::RateLimitInfo;
/// use reqwest::header::{HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("ratelimit-limit", HeaderValue::from_static("100"));
/// headers.insert("ratelimit-remaining", HeaderValue::from_static("12"));
///
/// let info = RateLimitInfo::from_headers(&headers).unwrap();
/// assert_eq!(info.limit, Some(100));
/// assert_eq!(info.remaining, Some(12));
/// assert_eq!(info.reset, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed in the current window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Seconds until the window resets.
    pub reset: Option<u64>,
}

impl RateLimitInfo {
    /// Parses the rate-limit headers.
    ///
    /// Returns `None` when none of the three headers yields a value.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_leading_integer)
        };

        let info = Self {
            limit: read(RATELIMIT_LIMIT_HEADER),
            remaining: read(RATELIMIT_REMAINING_HEADER),
            reset: read(RATELIMIT_RESET_HEADER),
        };

        if info == Self::default() {
            None
        } else {
            Some(info)
        }
    }

    /// Returns `true` if the server reports no requests left in the window.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Extracts the attachment filename from a `Content-Disposition` header.
///
/// An RFC 5987 `filename*=UTF-8''...` parameter wins over a plain
/// `filename=` parameter. Quoted and unquoted values are accepted.
#[must_use]
pub fn attachment_filename(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    parse_content_disposition(value)
}

/// Parses the filename out of a `Content-Disposition` header value.
///
/// Parameters are split on `;` outside quoted strings, and `\"` escapes
/// inside a quoted value are unescaped.
#[must_use]
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_parameters(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim();

        match key.as_str() {
            "filename" => {
                let name = unquote(raw);
                if !name.is_empty() {
                    plain = Some(name);
                }
            }
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
                if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"')) {
                    if !decoded.is_empty() {
                        extended = Some(decoded.into_owned());
                    }
                }
            }
            _ => {}
        }
    }

    extended.or(plain)
}

/// Splits a header value on `;` separators that are not inside quotes.
fn split_parameters(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (index, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

/// Strips surrounding quotes from a parameter value and resolves `\x` escapes.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
    else {
        return raw.to_string();
    };

    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                name.push(next);
            }
        } else {
            name.push(c);
        }
    }
    name
}

/// Returns the canonical reason phrase of a status code, or an empty string.
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_rate_limit_info_absent() {
        assert!(RateLimitInfo::from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_rate_limit_info_all_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(RATELIMIT_LIMIT_HEADER, HeaderValue::from_static("60"));
        headers.insert(RATELIMIT_REMAINING_HEADER, HeaderValue::from_static("0"));
        headers.insert(RATELIMIT_RESET_HEADER, HeaderValue::from_static("42 seconds"));

        let info = RateLimitInfo::from_headers(&headers).unwrap();
        assert_eq!(info.limit, Some(60));
        assert_eq!(info.remaining, Some(0));
        assert_eq!(info.reset, Some(42));
        assert!(info.is_exhausted());
    }

    #[test]
    fn test_content_disposition_quoted() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="filename.zip""#),
            Some("filename.zip".to_string())
        );
    }

    #[test]
    fn test_content_disposition_semicolon_inside_quotes() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="report;v2.zip""#),
            Some("report;v2.zip".to_string())
        );
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="a;b.txt"; size=10"#),
            Some("a;b.txt".to_string())
        );
    }

    #[test]
    fn test_content_disposition_unescapes_quoted_value() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="say \"hi\";.txt""#),
            Some(r#"say "hi";.txt"#.to_string())
        );
    }

    #[test]
    fn test_content_disposition_unquoted() {
        assert_eq!(
            parse_content_disposition("attachment; filename=report.csv"),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_content_disposition_prefers_extended_filename() {
        assert_eq!(
            parse_content_disposition(
                r#"attachment; filename="fallback.txt"; filename*=UTF-8''na%C3%AFve%20plan.txt"#
            ),
            Some("naïve plan.txt".to_string())
        );
    }

    #[test]
    fn test_content_disposition_without_filename() {
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition("inline; size=12"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_attachment_filename_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static(r#"attachment; filename="filename.zip""#),
        );
        assert_eq!(attachment_filename(&headers), Some("filename.zip".to_string()));
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(reqwest::StatusCode::TOO_MANY_REQUESTS), "Too Many Requests");
        assert_eq!(status_text(reqwest::StatusCode::from_u16(599).unwrap()), "");
    }
}
