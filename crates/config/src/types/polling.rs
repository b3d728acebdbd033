//! Search job polling and paging settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration_millis;
use crate::constants::{
    DEFAULT_MAX_JOB_WAIT, DEFAULT_PAGE_THROTTLE_MS, DEFAULT_POLL_INITIAL_MS, DEFAULT_POLL_JITTER,
    DEFAULT_POLL_MAX_MS, DEFAULT_POLL_MULTIPLIER, QUERY_JOB_RECORDS_LIMIT,
};

/// How long and how often a search job is polled, and how its records are paged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Status polls before the job is abandoned and deleted.
    pub max_job_wait: u32,
    #[serde(with = "duration_millis")]
    pub poll_initial: Duration,
    pub poll_multiplier: f64,
    #[serde(with = "duration_millis")]
    pub poll_max: Duration,
    /// Fraction in `[0, 1)` of each delay that is randomized.
    pub poll_jitter: f64,
    /// Pause before every record page after the first.
    #[serde(with = "duration_millis")]
    pub page_throttle: Duration,
    /// Cap on the rows returned for a single query.
    pub record_limit: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_job_wait: DEFAULT_MAX_JOB_WAIT,
            poll_initial: Duration::from_millis(DEFAULT_POLL_INITIAL_MS),
            poll_multiplier: DEFAULT_POLL_MULTIPLIER,
            poll_max: Duration::from_millis(DEFAULT_POLL_MAX_MS),
            poll_jitter: DEFAULT_POLL_JITTER,
            page_throttle: Duration::from_millis(DEFAULT_PAGE_THROTTLE_MS),
            record_limit: QUERY_JOB_RECORDS_LIMIT,
        }
    }
}
