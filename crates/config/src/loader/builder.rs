//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Support loading from environment variables, the credentials file, and direct builder methods.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Credentials file parsing (delegated to credentials_file.rs).
//! - Persisting credentials (see persistence).
//!
//! Invariants / Assumptions:
//! - Explicit `with_*` values beat environment variables, which beat the credentials file.
//!   `from_env` and `from_credentials_file` only fill gaps.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

use super::credentials_file::apply_credentials_file;
use super::env::{apply_env, env_var_or_none};
use super::error::ConfigError;
use crate::constants::{DEFAULT_ENDPOINT, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS};
use crate::types::{
    CacheConfig, Config, ConnectionConfig, Credentials, PollingConfig, SearchConfig,
};

/// Configuration loader that builds config from explicit values, env vars and files.
#[derive(Default)]
pub struct ConfigLoader {
    endpoint: Option<String>,
    access_id: Option<String>,
    access_key: Option<SecretString>,
    timeout: Option<Duration>,
    metrics_timeout: Option<Duration>,
    max_retries: Option<usize>,
    max_job_wait: Option<u32>,
    poll_initial: Option<Duration>,
    poll_max: Option<Duration>,
    page_throttle: Option<Duration>,
    record_limit: Option<usize>,
    time_zone: Option<String>,
    query_comment: Option<String>,
    search_cache_ttl: Option<Duration>,
    metrics_cache_ttl: Option<Duration>,
    cache_enabled: Option<bool>,
    config_path: Option<PathBuf>,
}

/// Fill `slot` only when nothing with higher priority set it already.
fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from `SUMOLOGIC_*` environment variables.
    ///
    /// Values given through `with_*` before this call are kept.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        let mut from_env = ConfigLoader::new();
        apply_env(&mut from_env)?;
        self.merge(from_env);
        Ok(self)
    }

    /// Fill missing credentials from the credentials file.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn from_credentials_file(mut self) -> Result<Self, ConfigError> {
        apply_credentials_file(&mut self)?;
        Ok(self)
    }

    /// Override the credentials file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_access_id(mut self, access_id: String) -> Self {
        self.access_id = Some(access_id);
        self
    }

    pub fn with_access_key(mut self, access_key: String) -> Self {
        self.access_key = Some(SecretString::new(access_key.into()));
        self
    }

    /// Set the request timeout for search job endpoints.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the number of status polls before a job is abandoned.
    pub fn with_max_job_wait(mut self, attempts: u32) -> Self {
        self.max_job_wait = Some(attempts);
        self
    }

    pub fn with_record_limit(mut self, limit: usize) -> Self {
        self.record_limit = Some(limit);
        self
    }

    pub fn with_time_zone(mut self, tz: String) -> Self {
        self.time_zone = Some(tz);
        self
    }

    pub fn with_query_comment(mut self, comment: String) -> Self {
        self.query_comment = Some(comment);
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    fn merge(&mut self, other: ConfigLoader) {
        fill(&mut self.endpoint, other.endpoint);
        fill(&mut self.access_id, other.access_id);
        fill(&mut self.access_key, other.access_key);
        fill(&mut self.timeout, other.timeout);
        fill(&mut self.metrics_timeout, other.metrics_timeout);
        fill(&mut self.max_retries, other.max_retries);
        fill(&mut self.max_job_wait, other.max_job_wait);
        fill(&mut self.poll_initial, other.poll_initial);
        fill(&mut self.poll_max, other.poll_max);
        fill(&mut self.page_throttle, other.page_throttle);
        fill(&mut self.record_limit, other.record_limit);
        fill(&mut self.time_zone, other.time_zone);
        fill(&mut self.query_comment, other.query_comment);
        fill(&mut self.search_cache_ttl, other.search_cache_ttl);
        fill(&mut self.metrics_cache_ttl, other.metrics_cache_ttl);
        fill(&mut self.cache_enabled, other.cache_enabled);
        fill(&mut self.config_path, other.config_path);
    }

    /// Build the final configuration.
    ///
    /// # Errors
    /// - `MissingCredentials` if the access id or key is unset.
    /// - `InvalidValue` if the endpoint is not an absolute http(s) URL.
    /// - `InvalidTimeout` / `InvalidMaxRetries` / `InvalidPolling` for out-of-range settings.
    pub fn build(self) -> Result<Config, ConfigError> {
        let (access_id, access_key) = match (self.access_id, self.access_key) {
            (Some(id), Some(key)) if !key.expose_secret().trim().is_empty() => (id, key),
            _ => return Err(ConfigError::MissingCredentials),
        };

        let endpoint = validate_and_normalize_endpoint(
            self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;

        let defaults = ConnectionConfig::default();
        let connection = ConnectionConfig {
            endpoint,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: defaults.connect_timeout,
            metrics_timeout: self.metrics_timeout.unwrap_or(defaults.metrics_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
        };
        Self::validate_connection(&connection)?;

        let defaults = PollingConfig::default();
        let polling = PollingConfig {
            max_job_wait: self.max_job_wait.unwrap_or(defaults.max_job_wait),
            poll_initial: self.poll_initial.unwrap_or(defaults.poll_initial),
            poll_max: self.poll_max.unwrap_or(defaults.poll_max),
            page_throttle: self.page_throttle.unwrap_or(defaults.page_throttle),
            record_limit: self.record_limit.unwrap_or(defaults.record_limit),
            ..defaults
        };
        Self::validate_polling(&polling)?;

        // TZ is only consulted when nothing Sumo-specific names a zone.
        let search = SearchConfig {
            time_zone: self
                .time_zone
                .or_else(|| env_var_or_none("TZ"))
                .unwrap_or_else(|| SearchConfig::default().time_zone),
            query_comment: self.query_comment,
        };

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            enabled: self.cache_enabled.unwrap_or(defaults.enabled),
            search_ttl: self.search_cache_ttl.unwrap_or(defaults.search_ttl),
            metrics_ttl: self.metrics_cache_ttl.unwrap_or(defaults.metrics_ttl),
            max_capacity: defaults.max_capacity,
        };

        Ok(Config {
            connection,
            credentials: Credentials {
                access_id,
                access_key,
            },
            polling,
            search,
            cache,
        })
    }

    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        for (name, value) in [
            ("timeout", connection.timeout),
            ("metrics_timeout", connection.metrics_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidTimeout {
                    message: format!("{name} must be greater than 0"),
                });
            }
            if value.as_secs() > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidTimeout {
                    message: format!(
                        "{name} exceeds maximum allowed value of {MAX_TIMEOUT_SECS} seconds"
                    ),
                });
            }
        }

        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, connection.max_retries
                ),
            });
        }

        Ok(())
    }

    fn validate_polling(polling: &PollingConfig) -> Result<(), ConfigError> {
        if polling.max_job_wait == 0 {
            return Err(ConfigError::InvalidPolling {
                message: "max_job_wait must be greater than 0".to_string(),
            });
        }
        if polling.poll_max < polling.poll_initial {
            return Err(ConfigError::InvalidPolling {
                message: format!(
                    "poll_max ({:?}) must not be shorter than poll_initial ({:?})",
                    polling.poll_max, polling.poll_initial
                ),
            });
        }
        if polling.record_limit == 0 {
            return Err(ConfigError::InvalidPolling {
                message: "record_limit must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    // Internal accessors for the other loader modules

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.access_id.is_some() && self.access_key.is_some()
    }

    pub(crate) fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub(crate) fn set_endpoint(&mut self, endpoint: Option<String>) {
        self.endpoint = endpoint;
    }

    pub(crate) fn set_access_id(&mut self, id: Option<String>) {
        self.access_id = id;
    }

    pub(crate) fn set_access_key(&mut self, key: Option<SecretString>) {
        self.access_key = key;
    }

    pub(crate) fn fill_credentials(&mut self, credentials: Credentials) {
        fill(&mut self.access_id, Some(credentials.access_id));
        fill(&mut self.access_key, Some(credentials.access_key));
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_metrics_timeout(&mut self, timeout: Option<Duration>) {
        self.metrics_timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_max_job_wait(&mut self, attempts: Option<u32>) {
        self.max_job_wait = attempts;
    }

    pub(crate) fn set_poll_initial(&mut self, delay: Option<Duration>) {
        self.poll_initial = delay;
    }

    pub(crate) fn set_poll_max(&mut self, delay: Option<Duration>) {
        self.poll_max = delay;
    }

    pub(crate) fn set_page_throttle(&mut self, delay: Option<Duration>) {
        self.page_throttle = delay;
    }

    pub(crate) fn set_record_limit(&mut self, limit: Option<usize>) {
        self.record_limit = limit;
    }

    pub(crate) fn set_time_zone(&mut self, tz: Option<String>) {
        self.time_zone = tz;
    }

    pub(crate) fn set_query_comment(&mut self, comment: Option<String>) {
        self.query_comment = comment;
    }

    pub(crate) fn set_search_cache_ttl(&mut self, ttl: Option<Duration>) {
        self.search_cache_ttl = ttl;
    }

    pub(crate) fn set_metrics_cache_ttl(&mut self, ttl: Option<Duration>) {
        self.metrics_cache_ttl = ttl;
    }

    pub(crate) fn set_cache_enabled(&mut self, enabled: Option<bool>) {
        self.cache_enabled = enabled;
    }
}

/// Validates and normalizes an endpoint URL.
///
/// - Trim surrounding whitespace; blank means missing
/// - Parse as an absolute URL with an http or https scheme and a host
/// - Strip trailing slashes so paths can be appended with `format!("{}/...")`
fn validate_and_normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingEndpoint);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "endpoint".into(),
        message: format!(
            "must be an absolute http(s) URL (e.g. https://api.sumologic.com/api/v1): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "endpoint".into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "endpoint".into(),
            message: "host is required (e.g. https://api.sumologic.com/api/v1)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
