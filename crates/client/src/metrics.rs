//! Metrics collection for API calls and search job lifecycles.
//!
//! This module records:
//! - Request latency histograms and request/retry/error counters
//! - Result cache hits and misses per cache
//! - Job status polls by state and job outcomes
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (see `metrics_exporter`)
//! - Persistent storage of metrics
//!
//! # Invariants
//! - All metrics use consistent label names: `endpoint`, `method`, `status`, `error_category`, `cache`, `state`, `outcome`
//! - Metric recording is infallible and never disrupts API calls
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "sumo_api_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "sumo_api_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "sumo_api_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "sumo_api_errors_total";

/// Metric name for cache hit counter.
pub const METRIC_CACHE_HITS: &str = "sumo_result_cache_hits_total";

/// Metric name for cache miss counter.
pub const METRIC_CACHE_MISSES: &str = "sumo_result_cache_misses_total";

/// Metric name for job status poll counter.
pub const METRIC_JOB_POLLS: &str = "sumo_search_job_polls_total";

/// Metric name for finished search jobs.
pub const METRIC_JOB_OUTCOMES: &str = "sumo_search_job_outcomes_total";

/// Metric name for rows returned per query.
pub const METRIC_RECORDS_FETCHED: &str = "sumo_search_job_records";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level errors (connection refused, DNS, etc.)
    Transport,
    /// HTTP 4xx client errors
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// Undecodable bodies or unknown job states
    Protocol,
    /// Request timeout
    Timeout,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::HttpError(e) if e.is_timeout() => ErrorCategory::Timeout,
            ClientError::HttpError(e) if e.is_connect() => ErrorCategory::Transport,
            ClientError::HttpError(e) if e.is_decode() => ErrorCategory::Protocol,
            ClientError::ApiError { status, .. } => match status {
                400..=499 => ErrorCategory::Http4xx,
                500..=599 => ErrorCategory::Http5xx,
                _ => ErrorCategory::Protocol,
            },
            ClientError::InvalidResponse(_) | ClientError::UnknownJobState(_) => {
                ErrorCategory::Protocol
            }
            ClientError::MetricsQueryFailed { .. } => ErrorCategory::Http4xx,
            ClientError::MaxRetriesExceeded(_, inner) => ErrorCategory::from(inner.as_ref()),
            ClientError::Shared(inner) => ErrorCategory::from(inner.as_ref()),
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Metrics collector for Sumo Logic API calls.
///
/// A lightweight wrapper around the `metrics` crate macros with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of an API request.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt, including retries.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    /// Record a retry attempt (1-based, not counting the initial request).
    pub fn record_retry(&self, endpoint: &str, method: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    pub fn record_error(&self, endpoint: &str, method: &str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record an error, categorizing it automatically.
    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        self.record_error(endpoint, method, ErrorCategory::from(error));
    }

    pub fn record_cache_hit(&self, cache: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_CACHE_HITS, "cache" => cache).increment(1);
    }

    pub fn record_cache_miss(&self, cache: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_CACHE_MISSES, "cache" => cache).increment(1);
    }

    /// Record one status poll and the state it reported.
    pub fn record_job_poll(&self, state: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_JOB_POLLS, "state" => state).increment(1);
    }

    /// Record how a search job ended and how many rows it produced.
    pub fn record_job_outcome(&self, outcome: &'static str, records: usize) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_JOB_OUTCOMES, "outcome" => outcome).increment(1);
        metrics::histogram!(METRIC_RECORDS_FETCHED, "outcome" => outcome).record(records as f64);
    }
}
