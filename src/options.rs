use std::time::Duration;

/// Production endpoint of the IPTU API.
pub const DEFAULT_BASE_URL: &str = "https://iptuapi.com.br/api/v1";

/// Configures endpoint, timeout and retry behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Base URL every request path is joined onto.
    pub base_url: String,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retry policy applied to transport failures.
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: 30_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks the base URL and the retry policy invariants.
    pub fn validate(&self) -> Result<(), InvalidOptions> {
        if self.base_url.trim().is_empty() {
            return Err(InvalidOptions::EmptyBaseUrl);
        }
        self.retry.validate()
    }
}

/// Retry behavior for transport-level failures (timeouts, refused or reset
/// connections).
///
/// HTTP error responses are never retried by the client itself.
/// `retryable_status_codes` lists the statuses a caller may choose to retry
/// with its own policy.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Statuses considered retryable by application-level callers.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_factor: 2.0,
            retryable_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InvalidOptions> {
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(InvalidOptions::InitialDelayAboveMax {
                initial_delay_ms: self.initial_delay_ms,
                max_delay_ms: self.max_delay_ms,
            });
        }
        if !(self.backoff_factor >= 1.0 && self.backoff_factor.is_finite()) {
            return Err(InvalidOptions::BackoffFactor(self.backoff_factor));
        }
        Ok(())
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Returns the delay schedule between attempts.
    ///
    /// The first value is `initial_delay_ms`; each following value is the
    /// previous one multiplied by `backoff_factor`, capped at `max_delay_ms`.
    pub fn backoff(&self) -> Backoff {
        let max_ms = self.max_delay_ms;
        let factor = if self.backoff_factor.is_finite() {
            self.backoff_factor.max(1.0)
        } else {
            1.0
        };
        Backoff {
            next_ms: self.initial_delay_ms.min(max_ms),
            max_ms,
            factor,
        }
    }
}

/// Infinite iterator over retry delays.
#[derive(Clone, Debug)]
pub struct Backoff {
    next_ms: u64,
    max_ms: u64,
    factor: f64,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next_ms;
        let scaled = current as f64 * self.factor;
        self.next_ms = if scaled >= self.max_ms as f64 {
            self.max_ms
        } else {
            scaled as u64
        };
        Some(Duration::from_millis(current))
    }
}

/// Rejected [`ClientOptions`] values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidOptions {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("initial delay {initial_delay_ms} ms exceeds max delay {max_delay_ms} ms")]
    InitialDelayAboveMax {
        initial_delay_ms: u64,
        max_delay_ms: u64,
    },
    #[error("backoff factor must be a finite value >= 1, got {0}")]
    BackoffFactor(f64),
}
