use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use reqwest::{header, header::HeaderMap, Method};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;

use crate::{
    classify::{self, classify_response},
    options::DEFAULT_BASE_URL,
    wire::{Envelope, Query},
    ClientOptions, IptuApiError, RateLimitSnapshot, Result,
};

const API_KEY_HEADER: &str = "X-API-Key";
const USER_AGENT: &str = concat!("iptuapi-rust/", env!("CARGO_PKG_VERSION"));

/// State taken from the most recently received response.
#[derive(Debug, Default)]
struct LastResponse {
    rate_limit: Option<RateLimitSnapshot>,
    request_id: Option<String>,
}

#[derive(Clone)]
/// HTTP client for the IPTU API.
///
/// Clones share the underlying session and the last-response state
/// ([`IptuClient::rate_limit_info`], [`IptuClient::last_request_id`]). That
/// state is last-write-wins: with concurrent calls it reflects whichever
/// response completed last, with no further ordering guarantee.
pub struct IptuClient {
    session: Arc<Mutex<Option<reqwest::Client>>>,
    api_key: String,
    options: ClientOptions,
    last: Arc<Mutex<LastResponse>>,
}

impl fmt::Debug for IptuClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IptuClient")
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl IptuClient {
    /// Creates a client for the production endpoint with default options.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Some(reqwest::Client::new()))),
            api_key: api_key.into(),
            options: ClientOptions::default(),
            last: Arc::new(Mutex::new(LastResponse::default())),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `IPTU_API_KEY` — API key (required)
    /// - `IPTU_API_BASE_URL` — overrides the production base URL (optional)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use iptuapi::IptuClient;
    ///
    /// let client = IptuClient::from_env().expect("missing IPTU_API_KEY");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let api_key = std::env::var("IPTU_API_KEY")
            .map_err(|_| "missing IPTU_API_KEY environment variable".to_owned())?;
        if api_key.trim().is_empty() {
            return Err("IPTU_API_KEY is set but empty".to_owned());
        }
        let base_url = std::env::var("IPTU_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Self::new(api_key.trim()).with_options(ClientOptions {
            base_url,
            ..ClientOptions::default()
        }))
    }

    /// Applies client options such as base URL, timeout and retry behavior.
    ///
    /// Options that fail [`ClientOptions::validate`] are still applied; the
    /// backoff schedule clamps them into range.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        if let Err(err) = opts.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "iptuapi", error = %err, "invalid client options");
            #[cfg(not(feature = "tracing"))]
            let _ = err;
        }
        self.options = opts;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Rate-limit state reported by the last received response.
    ///
    /// `None` before the first response, or when that response carried
    /// malformed rate-limit headers.
    pub fn rate_limit_info(&self) -> Option<RateLimitSnapshot> {
        lock(&self.last).rate_limit
    }

    /// `X-Request-ID` of the last received response.
    pub fn last_request_id(&self) -> Option<String> {
        lock(&self.last).request_id.clone()
    }

    /// Releases the HTTP session. Calling it again has no effect.
    ///
    /// Every later call fails with [`IptuApiError::Network`] without touching
    /// the network.
    pub fn close(&self) {
        if lock(&self.session).take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "iptuapi", "client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.session).is_none()
    }

    pub(crate) async fn get<T>(&self, path: &str, query: Query) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let body = self
            .send_with_retry::<()>(Method::GET, path, &query, None)
            .await?;
        decode_data(&body)
    }

    pub(crate) async fn post<T, B>(&self, path: &str, payload: &B) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let body = self
            .send_with_retry(Method::POST, path, &Query::new(), Some(payload))
            .await?;
        decode_data(&body)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Runs one logical request and returns the raw body of a successful
    /// response.
    ///
    /// Only transport failures are retried. An HTTP error response is
    /// classified and returned on the attempt that received it.
    async fn send_with_retry<B>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        payload: Option<&B>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let http = lock(&self.session)
            .clone()
            .ok_or_else(|| IptuApiError::network("client is closed"))?;
        let url = self.url(path);
        let timeout = self.options.timeout();
        let max_retries = self.options.retry.max_retries;
        let mut delays = self.options.retry.backoff();

        for attempt in 0..=max_retries {
            let mut request = http
                .request(method.clone(), &url)
                .header(API_KEY_HEADER, &self.api_key)
                .header(header::ACCEPT, "application/json")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::USER_AGENT, USER_AGENT)
                .timeout(timeout);
            if !query.pairs().is_empty() {
                request = request.query(query.pairs());
            }
            if let Some(payload) = payload {
                request = request.json(payload);
            }

            let failure = match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let headers = response.headers().clone();
                    self.record_response(&headers);

                    match response.text().await {
                        Ok(body) if status >= 400 => {
                            return Err(self.classified(status, &headers, &body, path));
                        }
                        Ok(body) => return Ok(body),
                        Err(err) => err,
                    }
                }
                Err(err) => err,
            };

            if !should_retry_transport(&failure) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "iptuapi",
                    path,
                    error = %failure,
                    "request failed before reaching the api"
                );

                return Err(self.transport_error(failure));
            }

            if attempt < max_retries {
                let delay = delays.next().unwrap_or_default();

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "iptuapi",
                    path,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "retrying request after transport failure"
                );

                sleep(delay).await;
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "iptuapi",
                path,
                attempts = attempt + 1,
                error = %failure,
                "request failed after exhausting retries"
            );

            return Err(self.transport_error(failure));
        }

        Err(IptuApiError::network("maximum attempts exceeded"))
    }

    fn record_response(&self, headers: &HeaderMap) {
        let mut last = lock(&self.last);
        last.rate_limit = RateLimitSnapshot::from_headers(headers);
        last.request_id = classify::request_id(headers);
    }

    fn classified(&self, status: u16, headers: &HeaderMap, body: &str, path: &str) -> IptuApiError {
        let error = classify_response(status, headers, body);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "iptuapi",
            path,
            status,
            kind = %error.kind(),
            request_id = error.request_id(),
            "request rejected by api"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = path;

        error
    }

    fn transport_error(&self, err: reqwest::Error) -> IptuApiError {
        if err.is_timeout() {
            let timeout = self.options.timeout();
            IptuApiError::Timeout {
                message: format!("request timed out after {}s", timeout.as_secs_f64()),
                timeout,
            }
        } else {
            let message = if should_retry_transport(&err) {
                format!("connection error: {err}")
            } else {
                format!("request error: {err}")
            };
            IptuApiError::Network {
                message,
                source: Some(err),
            }
        }
    }
}

/// Timeouts and connection-level failures. Builder and decode errors cannot
/// succeed on a second attempt.
fn should_retry_transport(err: &reqwest::Error) -> bool {
    !err.is_builder() && (err.is_timeout() || err.is_connect() || err.is_request() || err.is_body())
}

fn decode_data<T>(body: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| IptuApiError::network(format!("invalid response JSON: {err}")))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
