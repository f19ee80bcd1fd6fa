use std::{collections::BTreeMap, fmt, time::Duration};

use serde_json::{json, Map, Value as JsonValue};

/// Per-field validation messages reported by the API.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error type returned by this crate.
///
/// HTTP error responses map to exactly one variant by status code; transport
/// failures surface as [`IptuApiError::Timeout`] or
/// [`IptuApiError::Network`] once retries are exhausted.
#[derive(Debug, thiserror::Error)]
pub enum IptuApiError {
    /// Missing or invalid API key (401).
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        request_id: Option<String>,
    },
    /// The account plan does not grant access to the resource (403).
    #[error("forbidden: {message}")]
    Forbidden {
        message: String,
        /// Plan needed to access the resource, when the API reports it.
        required_plan: Option<String>,
        request_id: Option<String>,
    },
    /// Resource not found (404).
    #[error("not found: {message}")]
    NotFound {
        message: String,
        resource: Option<String>,
        request_id: Option<String>,
    },
    /// Quota exceeded (429).
    #[error("rate limit exceeded: {message} (retry after {retry_after}s)")]
    RateLimit {
        message: String,
        /// Seconds to wait, from `Retry-After`.
        retry_after: u64,
        request_id: Option<String>,
    },
    /// Rejected parameters (400 or 422).
    #[error("validation error {status}: {message}")]
    Validation {
        message: String,
        errors: FieldErrors,
        status: u16,
        request_id: Option<String>,
    },
    /// Server-side failure (5xx).
    #[error("server error {status}: {message}")]
    Server {
        message: String,
        status: u16,
        request_id: Option<String>,
    },
    /// Every attempt timed out.
    #[error("{message}")]
    Timeout { message: String, timeout: Duration },
    /// Connection-level failure, or a response that could not be decoded.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Any other HTTP error status.
    #[error("api error {status}: {message}")]
    Api {
        message: String,
        status: u16,
        request_id: Option<String>,
    },
}

/// Discriminant of [`IptuApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    Forbidden,
    NotFound,
    RateLimit,
    Validation,
    Server,
    Timeout,
    Network,
    Api,
}

impl ErrorKind {
    /// Stable name used in [`IptuApiError::to_map`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::Forbidden => "ForbiddenError",
            Self::NotFound => "NotFoundError",
            Self::RateLimit => "RateLimitError",
            Self::Validation => "ValidationError",
            Self::Server => "ServerError",
            Self::Timeout => "TimeoutError",
            Self::Network => "NetworkError",
            Self::Api => "ApiError",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Server | Self::Timeout | Self::Network
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IptuApiError {
    pub(crate) fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Network { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
        }
    }

    /// Whether the same logical request may be attempted again.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Human-readable message, as reported by the API when available.
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Forbidden { message, .. }
            | Self::NotFound { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Validation { message, .. }
            | Self::Server { message, .. }
            | Self::Timeout { message, .. }
            | Self::Network { message, .. }
            | Self::Api { message, .. } => message,
        }
    }

    /// HTTP status associated with the error.
    ///
    /// Timeouts report `408`; network failures have no status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Timeout { .. } => Some(408),
            Self::Validation { status, .. } | Self::Server { status, .. } | Self::Api { status, .. } => {
                Some(*status)
            }
            Self::Network { .. } => None,
        }
    }

    /// Value of the `X-Request-ID` header of the failed response, for support
    /// correlation.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Authentication { request_id, .. }
            | Self::Forbidden { request_id, .. }
            | Self::NotFound { request_id, .. }
            | Self::RateLimit { request_id, .. }
            | Self::Validation { request_id, .. }
            | Self::Server { request_id, .. }
            | Self::Api { request_id, .. } => request_id.as_deref(),
            Self::Timeout { .. } | Self::Network { .. } => None,
        }
    }

    /// Flattens the error into a JSON object for logs and telemetry.
    ///
    /// Always contains `error`, `message`, `status_code`, `request_id` and
    /// `retryable`, plus the fields specific to the variant.
    pub fn to_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        map.insert("error".to_owned(), json!(self.kind().as_str()));
        map.insert("message".to_owned(), json!(self.message()));
        map.insert("status_code".to_owned(), json!(self.status_code()));
        map.insert("request_id".to_owned(), json!(self.request_id()));
        map.insert("retryable".to_owned(), json!(self.is_retryable()));

        match self {
            Self::Forbidden { required_plan, .. } => {
                map.insert("required_plan".to_owned(), json!(required_plan));
            }
            Self::NotFound { resource, .. } => {
                map.insert("resource".to_owned(), json!(resource));
            }
            Self::RateLimit { retry_after, .. } => {
                map.insert("retry_after".to_owned(), json!(retry_after));
            }
            Self::Validation { errors, .. } => {
                map.insert("validation_errors".to_owned(), json!(errors));
            }
            Self::Timeout { timeout, .. } => {
                map.insert("timeout_seconds".to_owned(), json!(timeout.as_secs_f64()));
            }
            Self::Authentication { .. }
            | Self::Server { .. }
            | Self::Network { .. }
            | Self::Api { .. } => {}
        }

        map
    }
}
