//! HTTP page fetcher implementation
//!
//! Adapts a REST list endpoint to the [`PageFetcher`] contract.

use crate::error::{Error, Result, ResultExt};
use crate::fetch::PageFetcher;
use crate::types::{BackoffKind, JsonValue, OptionStringExt, StringMap};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the HTTP page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpFetcherConfig {
    /// Base URL of the API
    pub base_url: String,
    /// Endpoint path for the list resource
    pub path: String,
    /// Query parameter carrying the page cursor
    pub page_param: String,
    /// Optional query parameter carrying the page size
    pub per_page_param: Option<String>,
    /// Page size value sent with `per_page_param`
    pub per_page: Option<u32>,
    /// Dotted path to the records array in the response body
    ///
    /// `None` (or empty) means the body itself is the array.
    pub records_path: Option<String>,
    /// Default headers for all requests
    pub headers: StringMap,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,
    /// Backoff growth strategy
    pub backoff: BackoffKind,
    /// Requests per second (token bucket); `None` disables rate limiting
    pub requests_per_second: Option<u32>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            path: "/".to_string(),
            page_param: "page".to_string(),
            per_page_param: None,
            per_page: None,
            records_path: None,
            headers: StringMap::new(),
            timeout_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 60_000,
            backoff: BackoffKind::Exponential,
            requests_per_second: None,
        }
    }
}

impl HttpFetcherConfig {
    /// Create a config for the given endpoint
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the page cursor query parameter name
    #[must_use]
    pub fn page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Send a page-size query parameter with every request
    #[must_use]
    pub fn per_page(mut self, param: impl Into<String>, size: u32) -> Self {
        self.per_page_param = Some(param.into());
        self.per_page = Some(size);
        self
    }

    /// Set the dotted path to the records array
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set backoff configuration
    #[must_use]
    pub fn backoff(mut self, kind: BackoffKind, initial: Duration, max: Duration) -> Self {
        self.backoff = kind;
        self.initial_backoff_ms = initial.as_millis() as u64;
        self.max_backoff_ms = max.as_millis() as u64;
        self
    }

    /// Enable token-bucket rate limiting
    #[must_use]
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)?;
        if self.page_param.is_empty() {
            return Err(Error::invalid_config("page_param", "must not be empty"));
        }
        Ok(())
    }

    /// Parse and validate a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid fetcher YAML")?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Fetches pages of JSON records from a REST endpoint
pub struct HttpPageFetcher {
    client: Client,
    config: HttpFetcherConfig,
    limiter: Option<Arc<DirectLimiter>>,
}

impl HttpPageFetcher {
    /// Create a fetcher, validating the configuration
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("pagefeed/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let limiter = config.requests_per_second.map(|rps| {
            let quota = Quota::per_second(
                NonZeroU32::new(rps).unwrap_or(NonZeroU32::new(1).unwrap()),
            );
            Arc::new(RateLimiter::direct(quota))
        });

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    /// The fetcher's configuration
    pub fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.limiter.is_some()
    }

    /// Calculate backoff delay for a given attempt
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let initial = Duration::from_millis(self.config.initial_backoff_ms);
        let delay = match self.config.backoff {
            BackoffKind::Constant => initial,
            BackoffKind::Linear => initial * (attempt + 1),
            BackoffKind::Exponential => initial * 2u32.saturating_pow(attempt),
        };

        std::cmp::min(delay, Duration::from_millis(self.config.max_backoff_ms))
    }

    /// Full URL of the list endpoint
    fn page_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = self.config.path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Issue the page request, retrying retryable failures
    async fn get_page(&self, page: u32) -> Result<Response> {
        let url = self.page_url();
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.config.max_retries {
            // Wait for rate limiter
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let mut req = self
                .client
                .get(&url)
                .query(&[(self.config.page_param.as_str(), page.to_string())]);

            if let (Some(param), Some(size)) = (&self.config.per_page_param, self.config.per_page)
            {
                req = req.query(&[(param.as_str(), size.to_string())]);
            }

            for (key, value) in &self.config.headers {
                req = req.header(key.as_str(), value.as_str());
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_seconds(&response);
                        if attempt < self.config.max_retries {
                            warn!(
                                page,
                                attempt, retry_after, "rate limited (429), backing off"
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    if is_retryable_status(status) && attempt < self.config.max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            page,
                            status = status.as_u16(),
                            ?delay,
                            "retryable status, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::http_status(status.as_u16(), String::new()));
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!(page, %url, "page request succeeded");
                    return Ok(response);
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < self.config.max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(page, ?delay, "transport error, backing off: {e}");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Http(e));
                        continue;
                    }
                    return Err(Error::Http(e));
                }
            }
        }

        // Exhausted all retries
        Err(last_error.unwrap_or(Error::MaxRetriesExceeded {
            max_retries: self.config.max_retries,
        }))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    type Item = JsonValue;

    async fn fetch_page(&self, page: u32) -> Result<Vec<JsonValue>> {
        let response = self.get_page(page).await?;
        let body: JsonValue = response.json().await.map_err(Error::Http)?;
        let records_path = self.config.records_path.clone().none_if_empty();
        extract_records(&body, records_path.as_deref())
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Pull the records array out of a response body
pub(crate) fn extract_records(body: &JsonValue, path: Option<&str>) -> Result<Vec<JsonValue>> {
    let target = match path {
        None => body,
        Some(path) => {
            let trimmed = path.strip_prefix("$.").unwrap_or(path);
            let mut current = body;
            for part in trimmed.split('.') {
                current = current.get(part).ok_or_else(|| {
                    Error::record_extraction(path, format!("missing field '{part}'"))
                })?;
            }
            current
        }
    };

    match target {
        JsonValue::Array(records) => Ok(records.clone()),
        other => Err(Error::record_extraction(
            path.unwrap_or("$"),
            format!("expected an array, found {}", json_kind(other)),
        )),
    }
}

/// Human-readable JSON type name for error messages
fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Check if an HTTP status is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

/// Extract retry-after header value
fn retry_after_seconds(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
