//! Retry policy for rate-limited responses.
//!
//! These are pure functions over the response headers and the per-call
//! [`RetryState`]. [`HttpClient`](crate::clients::HttpClient) drives them from
//! its retry loop; they are public so callers can reason about (and test) the
//! same policy.
//!
//! # Policy
//!
//! - A `ratelimit-reset` header, when present and integer-parseable, is the
//!   wait for that retry.
//! - Otherwise the wait is `exponential_base ^ current_retry_count` seconds,
//!   capped at `max_waiting_time` when that limit is non-zero.
//! - The loop stops once `retry_limit` retries were made or `max_waiting_time`
//!   seconds have passed. A limit of `0` means unlimited for that dimension.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Header carrying the number of seconds until the rate-limit window resets.
pub const RATELIMIT_RESET_HEADER: &str = "ratelimit-reset";

/// Default base of the exponential backoff.
pub const DEFAULT_EXPONENTIAL_BASE: u64 = 2;

/// Per-call retry budget.
///
/// # Example
///
/// ```rust
/// use resilient_rest::RetryOptions;
///
/// let options = RetryOptions::default().retry_limit(5).max_waiting_time(120);
/// assert_eq!(options.exponential_base, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryOptions {
    /// Maximum number of retries (`0` = unlimited).
    pub retry_limit: u32,
    /// Maximum total seconds spent in the call before giving up (`0` = unlimited).
    pub max_waiting_time: u64,
    /// Base of the exponential backoff.
    pub exponential_base: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retry_limit: 0,
            max_waiting_time: 0,
            exponential_base: DEFAULT_EXPONENTIAL_BASE,
        }
    }
}

impl RetryOptions {
    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Sets the maximum number of seconds to keep retrying.
    #[must_use]
    pub const fn max_waiting_time(mut self, seconds: u64) -> Self {
        self.max_waiting_time = seconds;
        self
    }

    /// Sets the base of the exponential backoff.
    #[must_use]
    pub const fn exponential_base(mut self, base: u64) -> Self {
        self.exponential_base = base;
        self
    }

    /// Builds the retry state for the given point in the retry loop.
    #[must_use]
    pub const fn state(&self, current_retry_count: u32, passed_time: Duration) -> RetryState {
        RetryState {
            current_retry_count,
            exponential_base: self.exponential_base,
            max_waiting_time: self.max_waiting_time,
            passed_time,
            retry_limit: self.retry_limit,
        }
    }
}

/// Snapshot of one call's retry loop, taken on each 429 response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryState {
    /// Retries already made for this call.
    pub current_retry_count: u32,
    /// Base of the exponential backoff.
    pub exponential_base: u64,
    /// Maximum total seconds (`0` = unlimited).
    pub max_waiting_time: u64,
    /// Wall time elapsed since the call began.
    pub passed_time: Duration,
    /// Maximum number of retries (`0` = unlimited).
    pub retry_limit: u32,
}

/// Reads the `ratelimit-reset` header as a whole number of seconds.
///
/// The parse is lenient: leading whitespace and a `+` sign are skipped and
/// the leading run of digits is used, so `"42 seconds"` yields `42`.
/// Returns `None` when the header is absent or has no leading digits.
#[must_use]
pub fn get_rate_limit_from_response(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RATELIMIT_RESET_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_leading_integer)
}

/// Parses the leading integer of a header value.
pub(crate) fn parse_leading_integer(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if digits_end == 0 {
        return None;
    }
    // Saturate rather than reject absurdly large values
    Some(value[..digits_end].parse().unwrap_or(u64::MAX))
}

/// Computes the number of seconds to wait before the next retry.
#[must_use]
pub fn calculate_waiting_time(headers: &HeaderMap, state: &RetryState) -> u64 {
    if let Some(reset) = get_rate_limit_from_response(headers) {
        return reset;
    }

    let wait = state
        .exponential_base
        .saturating_pow(state.current_retry_count);

    if state.max_waiting_time > 0 {
        wait.min(state.max_waiting_time)
    } else {
        wait
    }
}

/// Returns `true` once either budget of the retry loop is exhausted.
#[must_use]
pub fn retry_limit_reached(state: &RetryState) -> bool {
    let count_exhausted =
        state.retry_limit > 0 && state.current_retry_count >= state.retry_limit;
    let time_exhausted = state.max_waiting_time > 0
        && state.passed_time >= Duration::from_secs(state.max_waiting_time);
    count_exhausted || time_exhausted
}

/// Suspends the retry loop between attempts.
///
/// The default implementation is [`TokioSleeper`]. Supplying another
/// implementation lets callers observe or shorten backoff waits.
#[async_trait]
pub trait Sleeper: Send + Sync + fmt::Debug {
    /// Waits for the given number of seconds.
    async fn wait(&self, seconds: u64);
}

/// [`Sleeper`] backed by [`tokio::time::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn wait(&self, seconds: u64) {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }
}
