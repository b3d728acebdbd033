//! Centralized constants for the Sumo Logic search workspace.
//!
//! Default values shared by the config loader, the client builder and the CLI,
//! kept here so no crate carries its own copy of a magic number.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default API endpoint (US1 deployment).
pub const DEFAULT_ENDPOINT: &str = "https://api.sumologic.com/api/v1/";

/// Default request timeout for search job endpoints in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default request timeout for the synchronous metrics endpoint in seconds.
pub const DEFAULT_METRICS_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of retries for transient HTTP failures.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound for configured retries.
pub const MAX_MAX_RETRIES: usize = 10;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("sumo-cli/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Search Job Polling Defaults
// =============================================================================

/// Default number of status polls before a search job is abandoned.
pub const DEFAULT_MAX_JOB_WAIT: u32 = 200;

/// Delay before the first status poll in milliseconds.
pub const DEFAULT_POLL_INITIAL_MS: u64 = 3000;

/// Growth factor applied to the poll delay after each attempt.
pub const DEFAULT_POLL_MULTIPLIER: f64 = 1.25;

/// Upper bound for the poll delay in milliseconds.
pub const DEFAULT_POLL_MAX_MS: u64 = 5000;

/// Fraction of the poll delay randomized in either direction.
pub const DEFAULT_POLL_JITTER: f64 = 0.1;

/// Pause between record page requests in milliseconds.
pub const DEFAULT_PAGE_THROTTLE_MS: u64 = 1000;

/// Largest page the records endpoint will serve, and the default row cap.
pub const QUERY_JOB_RECORDS_LIMIT: usize = 10_000;

// =============================================================================
// Cache Defaults
// =============================================================================

/// Search job results stay cached for one hour.
pub const DEFAULT_SEARCH_CACHE_TTL_SECS: u64 = 3600;

/// Metrics query results stay cached for five minutes.
pub const DEFAULT_METRICS_CACHE_TTL_SECS: u64 = 300;

/// Default maximum number of cached result sets.
pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 1000;

// =============================================================================
// Search Defaults
// =============================================================================

/// Time zone used when neither config nor `TZ` provide one.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Default lookback window for searches without an explicit `from`.
pub const DEFAULT_SEARCH_WINDOW_HOURS: i64 = 24;
