//! Search defaults and result cache settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration_seconds;
use crate::constants::{
    DEFAULT_CACHE_MAX_CAPACITY, DEFAULT_METRICS_CACHE_TTL_SECS, DEFAULT_SEARCH_CACHE_TTL_SECS,
    DEFAULT_TIME_ZONE,
};

/// Defaults applied to every search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Time zone sent with search jobs when the caller does not pick one.
    pub time_zone: String,
    /// Prepended to the query as `// {comment}` so backend audit logs show the caller.
    pub query_comment: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            query_comment: None,
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    #[serde(with = "duration_seconds")]
    pub search_ttl: Duration,
    #[serde(with = "duration_seconds")]
    pub metrics_ttl: Duration,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_ttl: Duration::from_secs(DEFAULT_SEARCH_CACHE_TTL_SECS),
            metrics_ttl: Duration::from_secs(DEFAULT_METRICS_CACHE_TTL_SECS),
            max_capacity: DEFAULT_CACHE_MAX_CAPACITY,
        }
    }
}
