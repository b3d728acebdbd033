//! Sumo Logic search job and metrics query client.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - [`backoff`]: Status poll delay policy
//! - [`cache`]: Fingerprint-keyed result cache
//! - [`progress`]: Poll progress hook
//! - `search`: Query entry point and record pagination
//! - `running_query`: Poll loop and job release for one submitted job
//! - `metrics_queries`: Synchronous metrics queries
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Rendering rows (callers own presentation)
//!
//! # Invariants
//! - A query is a strictly sequential chain of awaited requests and sleeps
//! - Identical requests within their TTL are served from cache without network calls
//! - Only results of jobs that reached COMPLETE are cached

pub mod backoff;
pub mod builder;
pub mod cache;
mod metrics_queries;
pub mod progress;
mod running_query;
mod search;

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use sumo_config::Credentials;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::backoff::BackoffPolicy;
use crate::client::cache::ResultCache;
use crate::client::progress::PollProgress;
use crate::metrics::MetricsCollector;
use crate::models::RecordSet;

/// Sumo Logic API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use sumo_client::{SearchOptions, SumoClient};
/// use sumo_config::Credentials;
///
/// let client = SumoClient::builder()
///     .endpoint("https://api.sumologic.com/api/v1")
///     .credentials(Credentials::new("suABC", "secret"))
///     .build()?;
///
/// let rows = client
///     .query("_sourceCategory=prod | count by _sourceHost", SearchOptions::default())
///     .await?;
/// ```
pub struct SumoClient {
    pub(crate) http: reqwest::Client,
    pub(crate) metrics_http: reqwest::Client,
    pub(crate) endpoint: String,
    pub(crate) credentials: Credentials,
    pub(crate) max_retries: usize,
    pub(crate) metrics_timeout: Duration,
    pub(crate) backoff: BackoffPolicy,
    pub(crate) max_poll_attempts: u32,
    pub(crate) page_throttle: Duration,
    pub(crate) records_page_size: usize,
    pub(crate) record_limit: usize,
    pub(crate) search_ttl: Duration,
    pub(crate) metrics_ttl: Duration,
    pub(crate) search_cache: ResultCache<RecordSet>,
    pub(crate) metrics_cache: ResultCache<Value>,
    pub(crate) query_comment: Option<String>,
    pub(crate) default_time_zone: String,
    pub(crate) progress: Option<Arc<dyn PollProgress>>,
    pub(crate) metrics: Option<MetricsCollector>,
    /// Deletes spawned for queries dropped before they settled.
    pub(crate) releases: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl fmt::Debug for SumoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumoClient")
            .field("endpoint", &self.endpoint)
            .field("access_id", &self.credentials.access_id)
            .field("max_retries", &self.max_retries)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("record_limit", &self.record_limit)
            .field("search_cache", &self.search_cache)
            .field("metrics_cache", &self.metrics_cache)
            .finish_non_exhaustive()
    }
}

impl SumoClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SumoClientBuilder {
        builder::SumoClientBuilder::new()
    }

    /// The normalized API endpoint (no trailing slash).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait up to `timeout` for deletes of abandoned search jobs.
    ///
    /// A query future dropped mid-poll hands its job delete to a spawned task.
    /// Call this before the runtime shuts down so those deletes reach the backend.
    pub async fn finish_releases(&self, timeout: Duration) {
        let pending = match self.releases.lock() {
            Ok(mut releases) => std::mem::take(&mut *releases),
            Err(_) => return,
        };
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let all = async {
            for task in pending {
                let _ = task.await;
            }
        };
        if tokio::time::timeout(timeout, all).await.is_err() {
            warn!(pending = count, "Timed out waiting for abandoned search jobs to be deleted");
        }
    }

    pub(crate) fn track_release(&self, task: JoinHandle<()>) {
        if let Ok(mut releases) = self.releases.lock() {
            releases.retain(|t| !t.is_finished());
            releases.push(task);
        }
    }

    /// Drop every cached search and metrics result.
    pub fn clear_cache(&self) {
        self.search_cache.invalidate_all();
        self.metrics_cache.invalidate_all();
    }
}
