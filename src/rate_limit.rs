use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderMap;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota state reported by the most recent response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Requests allowed in the current window.
    pub limit: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the window resets.
    pub reset: u64,
}

impl RateLimitSnapshot {
    /// Parses the `X-RateLimit-*` headers.
    ///
    /// Absent headers count as `0`. Returns `None` when any header is present
    /// but is not an unsigned integer.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            limit: header_or_zero(headers, LIMIT_HEADER)?,
            remaining: header_or_zero(headers, REMAINING_HEADER)?,
            reset: header_or_zero(headers, RESET_HEADER)?,
        })
    }

    pub fn reset_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.reset)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn header_or_zero(headers: &HeaderMap, name: &str) -> Option<u64> {
    match headers.get(name) {
        None => Some(0),
        Some(value) => value.to_str().ok()?.trim().parse().ok(),
    }
}
