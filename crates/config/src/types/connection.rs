//! Connection configuration types.
//!
//! Responsibilities:
//! - Define connection settings (endpoint, timeouts, retries).
//! - Define the main `Config` structure combining every section.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - Duration fields are serialized as whole seconds.
//! - `endpoint` is stored without trailing slashes once it has passed through the loader.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration_seconds;
use super::{CacheConfig, Credentials, PollingConfig, SearchConfig};
use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES,
    DEFAULT_METRICS_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};

/// Connection settings for the Sumo Logic API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// API endpoint for the deployment, e.g. `https://api.eu.sumologic.com/api/v1`
    pub endpoint: String,
    /// Request timeout for search job endpoints
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    #[serde(with = "duration_seconds")]
    pub connect_timeout: Duration,
    /// Request timeout for the synchronous metrics endpoint
    #[serde(with = "duration_seconds")]
    pub metrics_timeout: Duration,
    /// Retries for transient HTTP failures (429/502/503/504)
    pub max_retries: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            metrics_timeout: Duration::from_secs(DEFAULT_METRICS_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub credentials: Credentials,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Create a config with default settings for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            connection: ConnectionConfig::default(),
            credentials,
            polling: PollingConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Create a config pointing at a specific endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        let mut config = Self::new(credentials);
        config.connection.endpoint = endpoint.into();
        config
    }
}
