//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` and `env_lock()` to prevent environment variable pollution.
//! - Every test starts from a scrubbed `SUMOLOGIC_*` environment via `scrubbed_env`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

const SUMO_VARS: &[&str] = &[
    "SUMOLOGIC_CONFIG_PATH",
    "SUMOLOGIC_ENDPOINT",
    "SUMOLOGIC_ACCESS_ID",
    "SUMOLOGIC_ACCESS_KEY",
    "SUMOLOGIC_TIMEOUT",
    "SUMOLOGIC_METRICS_TIMEOUT",
    "SUMOLOGIC_MAX_RETRIES",
    "SUMOLOGIC_MAX_JOB_WAIT",
    "SUMOLOGIC_POLL_INITIAL_MS",
    "SUMOLOGIC_POLL_MAX_MS",
    "SUMOLOGIC_PAGE_THROTTLE_MS",
    "SUMOLOGIC_RECORD_LIMIT",
    "SUMOLOGIC_TIMEZONE",
    "SUMOLOGIC_QUERY_COMMENT",
    "SUMOLOGIC_SEARCH_CACHE_TTL",
    "SUMOLOGIC_METRICS_CACHE_TTL",
    "SUMOLOGIC_CACHE_DISABLED",
    "TZ",
];

/// Every known variable unset, then `overrides` applied on top.
pub fn scrubbed_env<'a>(overrides: &[(&'a str, &'a str)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut vars: Vec<(&str, Option<&str>)> = SUMO_VARS
        .iter()
        .filter(|name| !overrides.iter().any(|(k, _)| k == *name))
        .map(|name| (*name, None))
        .collect();
    vars.extend(overrides.iter().map(|(k, v)| (*k, Some(*v))));
    vars
}
