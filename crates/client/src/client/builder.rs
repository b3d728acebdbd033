//! Client builder for constructing [`SumoClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (endpoint, credentials)
//! - Normalizing the endpoint (removing trailing slashes)
//! - Configuring the underlying HTTP client (headers, timeouts, cookies, redirects)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`SumoClient`] methods)
//! - Reading configuration sources (handled by `sumo_config::ConfigLoader`)
//!
//! # Invariants
//! - `endpoint` and `credentials` are required and must be provided before calling `build()`
//! - The endpoint is always normalized to have no trailing slashes
//! - Redirects are never followed; the cookie store is always on so a job
//!   stays pinned to the node that created it

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use sumo_config::{
    Config, Credentials,
    constants::{
        DEFAULT_CACHE_MAX_CAPACITY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_JOB_WAIT,
        DEFAULT_MAX_RETRIES, DEFAULT_METRICS_CACHE_TTL_SECS, DEFAULT_METRICS_TIMEOUT_SECS,
        DEFAULT_PAGE_THROTTLE_MS, DEFAULT_SEARCH_CACHE_TTL_SECS, DEFAULT_TIME_ZONE,
        DEFAULT_TIMEOUT_SECS, QUERY_JOB_RECORDS_LIMIT, USER_AGENT,
    },
};

use crate::client::SumoClient;
use crate::client::backoff::BackoffPolicy;
use crate::client::cache::ResultCache;
use crate::client::progress::PollProgress;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Builder for creating a new [`SumoClient`].
///
/// Every option has a default except `endpoint` and `credentials`.
///
/// # Example
///
/// ```rust,ignore
/// use sumo_client::SumoClient;
/// use sumo_config::Credentials;
///
/// let client = SumoClient::builder()
///     .endpoint("https://api.sumologic.com/api/v1")
///     .credentials(Credentials::new("suABC", "secret"))
///     .max_poll_attempts(100)
///     .build()?;
/// ```
pub struct SumoClientBuilder {
    endpoint: Option<String>,
    credentials: Option<Credentials>,
    timeout: Duration,
    connect_timeout: Duration,
    metrics_timeout: Duration,
    max_retries: usize,
    backoff: BackoffPolicy,
    max_poll_attempts: u32,
    page_throttle: Duration,
    records_page_size: usize,
    record_limit: usize,
    cache_enabled: bool,
    cache_capacity: u64,
    search_ttl: Duration,
    metrics_ttl: Duration,
    query_comment: Option<String>,
    default_time_zone: String,
    progress: Option<Arc<dyn PollProgress>>,
    metrics: Option<MetricsCollector>,
}

impl Default for SumoClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            metrics_timeout: Duration::from_secs(DEFAULT_METRICS_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffPolicy::default(),
            max_poll_attempts: DEFAULT_MAX_JOB_WAIT,
            page_throttle: Duration::from_millis(DEFAULT_PAGE_THROTTLE_MS),
            records_page_size: QUERY_JOB_RECORDS_LIMIT,
            record_limit: QUERY_JOB_RECORDS_LIMIT,
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_MAX_CAPACITY,
            search_ttl: Duration::from_secs(DEFAULT_SEARCH_CACHE_TTL_SECS),
            metrics_ttl: Duration::from_secs(DEFAULT_METRICS_CACHE_TTL_SECS),
            query_comment: None,
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
            progress: None,
            metrics: None,
        }
    }
}

impl SumoClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API endpoint, e.g. `https://api.sumologic.com/api/v1`.
    ///
    /// Trailing slashes are removed.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Request timeout for search job endpoints. Default is 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connect and request timeout for the metrics endpoint. Default is 30 seconds.
    pub fn metrics_timeout(mut self, timeout: Duration) -> Self {
        self.metrics_timeout = timeout;
        self
    }

    /// Retries for transient HTTP failures (1s, 2s, 4s delays). Default is 3.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Delay policy between status polls.
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Status polls before a job is abandoned. Default is 200.
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Pause before each record page after the first. Default is 1 second.
    pub fn page_throttle(mut self, throttle: Duration) -> Self {
        self.page_throttle = throttle;
        self
    }

    /// Rows requested per records page, at most 10000.
    pub fn records_page_size(mut self, size: usize) -> Self {
        self.records_page_size = size;
        self
    }

    /// Cap on rows returned by one query. Default is 10000.
    pub fn record_limit(mut self, limit: usize) -> Self {
        self.record_limit = limit;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// How long completed search results are served from cache. Default is 1 hour.
    pub fn search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = ttl;
        self
    }

    /// How long metrics results are served from cache. Default is 5 minutes.
    pub fn metrics_ttl(mut self, ttl: Duration) -> Self {
        self.metrics_ttl = ttl;
        self
    }

    /// Identify the caller in backend audit logs; prepended as `// {comment}`.
    pub fn query_comment(mut self, comment: impl Into<String>) -> Self {
        self.query_comment = Some(comment.into());
        self
    }

    /// Time zone sent with searches that do not pick one.
    pub fn default_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.default_time_zone = tz.into();
        self
    }

    pub fn progress(mut self, progress: Arc<dyn PollProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the metrics collector for API call and job lifecycle tracking.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from loaded configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.endpoint = Some(config.connection.endpoint.clone());
        self.credentials = Some(config.credentials.clone());
        self.timeout = config.connection.timeout;
        self.connect_timeout = config.connection.connect_timeout;
        self.metrics_timeout = config.connection.metrics_timeout;
        self.max_retries = config.connection.max_retries;
        self.backoff = BackoffPolicy::from(&config.polling);
        self.max_poll_attempts = config.polling.max_job_wait;
        self.page_throttle = config.polling.page_throttle;
        self.record_limit = config.polling.record_limit;
        self.cache_enabled = config.cache.enabled;
        self.cache_capacity = config.cache.max_capacity;
        self.search_ttl = config.cache.search_ttl;
        self.metrics_ttl = config.cache.metrics_ttl;
        self.query_comment = config.search.query_comment.clone();
        self.default_time_zone = config.search.time_zone.clone();
        self
    }

    /// Normalize an endpoint by removing trailing slashes.
    ///
    /// - `"https://api.sumologic.com/api/v1/"` -> `"https://api.sumologic.com/api/v1"`
    /// - `"https://api.sumologic.com/api/v1//"` -> `"https://api.sumologic.com/api/v1"`
    fn normalize_endpoint(endpoint: String) -> String {
        endpoint.trim_end_matches('/').to_string()
    }

    /// Build the [`SumoClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the endpoint is missing or blank.
    /// Returns [`ClientError::MissingCredentials`] if credentials were not provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<SumoClient> {
        let endpoint = self
            .endpoint
            .map(Self::normalize_endpoint)
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ClientError::InvalidUrl("endpoint is required".to_string()))?;

        let credentials = self
            .credentials
            .ok_or_else(|| ClientError::MissingCredentials("access id and key are required".to_string()))?;

        let http = Self::http_client(self.timeout, self.connect_timeout)?;
        let metrics_http = Self::http_client(self.metrics_timeout, self.metrics_timeout)?;

        let (search_cache, metrics_cache) = if self.cache_enabled {
            (
                ResultCache::with_capacity("search", self.cache_capacity),
                ResultCache::with_capacity("metrics", self.cache_capacity),
            )
        } else {
            (ResultCache::disabled("search"), ResultCache::disabled("metrics"))
        };
        let (search_cache, metrics_cache) = match &self.metrics {
            Some(m) => (
                search_cache.with_metrics(m.clone()),
                metrics_cache.with_metrics(m.clone()),
            ),
            None => (search_cache, metrics_cache),
        };

        Ok(SumoClient {
            http,
            metrics_http,
            endpoint,
            credentials,
            max_retries: self.max_retries,
            metrics_timeout: self.metrics_timeout,
            backoff: self.backoff,
            max_poll_attempts: self.max_poll_attempts.max(1),
            page_throttle: self.page_throttle,
            records_page_size: self.records_page_size.clamp(1, QUERY_JOB_RECORDS_LIMIT),
            record_limit: self.record_limit.max(1),
            search_ttl: self.search_ttl,
            metrics_ttl: self.metrics_ttl,
            search_cache,
            metrics_cache,
            query_comment: self.query_comment.filter(|c| !c.trim().is_empty()),
            default_time_zone: self.default_time_zone,
            progress: self.progress,
            metrics: self.metrics,
            releases: Arc::default(),
        })
    }

    /// HTTP client with shared headers, a cookie store and no redirects.
    ///
    /// Connect timeouts are per client in reqwest, so the metrics endpoint gets
    /// a client of its own.
    fn http_client(timeout: Duration, connect_timeout: Duration) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?)
    }
}
