//! Sumo Logic Search Job and Metrics Query API client.
//!
//! This crate submits search jobs, polls them to completion with a bounded,
//! jittered backoff, pages through their aggregate records and caches
//! completed results by request fingerprint. It also runs synchronous
//! metrics queries through the same cache.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tracing;

pub use client::SumoClient;
pub use client::backoff::BackoffPolicy;
pub use client::builder::SumoClientBuilder;
pub use client::cache::{CachedResult, ResultCache, fingerprint};
pub use client::progress::PollProgress;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{
    Job, JobState, JobStatus, MetricsQuery, MetricsRequest, Record, RecordSet, SearchOptions,
    SearchRequest, TimeRange, TimeRangeBoundary, format_timeslices, timeslice_label,
};
pub use crate::tracing::{LogFormat, TracingConfig, TracingGuard, inject_trace_context};
