//! Search job state machine and status payloads.
//!
//! # What this module handles:
//! - Mapping backend state strings onto [`JobState`]
//! - Human-readable state definitions for progress logging
//! - Job submission and status response payloads
//!
//! # What this module does NOT handle:
//! - Polling or sleeping (see `client::search`)
//!
//! # Invariants
//! - Only `Complete` reports `is_complete()`
//! - Unknown state strings are errors, never coerced to `Cancelled`
//! - `RateLimited` is produced only from HTTP 429 and never by string mapping

use serde::Deserialize;
use std::fmt;

use crate::error::{ClientError, Result};

/// State of a search job as seen by the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    NotStarted,
    InProgress,
    Complete,
    Cancelled,
    /// The status endpoint answered 429; the real state is unknown for this poll.
    RateLimited,
}

impl JobState {
    /// Map a backend `state` string.
    pub fn from_backend(state: &str) -> Result<Self> {
        match state {
            "NOT STARTED" => Ok(Self::NotStarted),
            "GATHERING RESULTS" | "GATHERING RESULTS FROM SUBQUERIES" => Ok(Self::InProgress),
            "DONE GATHERING RESULTS" => Ok(Self::Complete),
            "CANCELED" => Ok(Self::Cancelled),
            other => Err(ClientError::UnknownJobState(other.to_string())),
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }

    /// True for states that end the poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }

    pub fn definition(self) -> &'static str {
        match self {
            Self::NotStarted => "Search job has not been started yet.",
            Self::InProgress => {
                "Search job is still gathering more results, however results might already be available."
            }
            Self::Complete => {
                "Search job is done gathering results; the entire specified time range has been covered."
            }
            Self::Cancelled => "The search job has been cancelled.",
            Self::RateLimited => "Job status requests are being rate limited; polling again.",
        }
    }

    /// Label used in metrics and structured logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted search job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub state: JobState,
}

/// Body of a successful (202) job submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobResponse {
    pub id: String,
}

/// Raw status payload from `GET /search/jobs/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub state: String,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub record_count: u64,
    #[serde(default)]
    pub pending_errors: Vec<String>,
    #[serde(default)]
    pub pending_warnings: Vec<String>,
}

/// One status poll, mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: JobState,
    pub message_count: u64,
    pub record_count: u64,
    pub pending_errors: Vec<String>,
    pub pending_warnings: Vec<String>,
}

impl JobStatus {
    pub fn rate_limited() -> Self {
        Self {
            state: JobState::RateLimited,
            message_count: 0,
            record_count: 0,
            pending_errors: Vec::new(),
            pending_warnings: Vec::new(),
        }
    }
}

impl TryFrom<JobStatusResponse> for JobStatus {
    type Error = ClientError;

    fn try_from(raw: JobStatusResponse) -> Result<Self> {
        Ok(Self {
            state: JobState::from_backend(&raw.state)?,
            message_count: raw.message_count,
            record_count: raw.record_count,
            pending_errors: raw.pending_errors,
            pending_warnings: raw.pending_warnings,
        })
    }
}
