//! One submitted search job: poll until it settles, collect its rows, release it.
//!
//! # What this module handles:
//! - The status poll loop, its attempt budget and backoff sleeps
//! - Progress and log output per attempt
//! - Fetching and post-processing records once polling ends
//! - Best-effort deletion of jobs that did not complete
//!
//! # Invariants
//! - Polling ends after at most `max_poll_attempts` status checks; 429 polls count
//! - A rate-limited poll never overwrites the last real job state
//! - COMPLETE jobs are left for the backend to retire; every other exit deletes
//!   the job exactly once, and a failed delete is logged, never returned
//! - Dropping an unsettled query (its future was cancelled) spawns the delete on
//!   the current runtime and registers it with the client

use tracing::{debug, error, info, warn};

use crate::client::SumoClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{JobState, RecordSet, format_timeslices};

/// Rows produced by a job and whether the job actually completed.
#[derive(Debug)]
pub(crate) struct JobOutcome {
    pub records: RecordSet,
    pub completed: bool,
}

/// How polling ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollEnd {
    Complete,
    Cancelled,
    TimedOut,
}

impl PollEnd {
    fn label(self) -> &'static str {
        match self {
            PollEnd::Complete => "complete",
            PollEnd::Cancelled => "cancelled",
            PollEnd::TimedOut => "timed_out",
        }
    }
}

pub(crate) struct RunningQuery<'a> {
    client: &'a SumoClient,
    job_id: String,
    last_state: JobState,
    attempts: u32,
    settled: bool,
}

impl<'a> RunningQuery<'a> {
    pub(crate) fn new(client: &'a SumoClient, job_id: String) -> Self {
        Self {
            client,
            job_id,
            last_state: JobState::NotStarted,
            attempts: 0,
            settled: false,
        }
    }

    /// Drive the job to the end and return its rows.
    ///
    /// Timeout and cancellation are not errors: the rows available so far are
    /// returned with `completed == false`.
    pub(crate) async fn run(mut self) -> Result<JobOutcome> {
        let max_attempts = self.client.max_poll_attempts;
        if let Some(progress) = &self.client.progress {
            progress.add_steps(u64::from(max_attempts));
        }

        let polled = self.poll().await;

        if let Some(progress) = &self.client.progress {
            progress.advance(u64::from(max_attempts.saturating_sub(self.attempts)));
        }

        let result = match polled {
            Ok(end) => self.collect(end).await,
            Err(e) => Err(e),
        };

        let completed = matches!(&result, Ok(outcome) if outcome.completed);
        self.settled = true;
        if !completed {
            self.release().await;
        }

        if let Some(m) = &self.client.metrics {
            let rows = result.as_ref().map_or(0, |outcome| outcome.records.len());
            m.record_job_outcome(outcome_label(&result, self.last_state), rows);
        }

        result
    }

    async fn poll(&mut self) -> Result<PollEnd> {
        let client = self.client;
        let max_attempts = client.max_poll_attempts;

        while self.attempts < max_attempts {
            tokio::time::sleep(client.backoff.jittered_delay(self.attempts)).await;
            self.attempts += 1;

            let status = endpoints::get_job_status(
                &client.http,
                &client.endpoint,
                &client.credentials,
                &self.job_id,
                client.metrics.as_ref(),
            )
            .await?;

            if let Some(progress) = &client.progress {
                progress.advance(1);
            }
            if let Some(m) = &client.metrics {
                m.record_job_poll(status.state.as_str());
            }

            info!(
                job_id = %self.job_id,
                attempt = self.attempts,
                max_attempts,
                state = %status.state,
                records = status.record_count,
                messages = status.message_count,
                "Search job {}/{}: {}",
                self.attempts,
                max_attempts,
                status.state.definition()
            );
            if !status.pending_errors.is_empty() {
                warn!(job_id = %self.job_id, errors = ?status.pending_errors, "Search job reported errors");
            }
            if !status.pending_warnings.is_empty() {
                debug!(job_id = %self.job_id, warnings = ?status.pending_warnings, "Search job reported warnings");
            }

            match status.state {
                JobState::RateLimited => continue,
                JobState::Complete => {
                    self.last_state = JobState::Complete;
                    return Ok(PollEnd::Complete);
                }
                JobState::Cancelled => {
                    self.last_state = JobState::Cancelled;
                    error!(job_id = %self.job_id, attempt = self.attempts, "Search job was cancelled by the backend");
                    return Ok(PollEnd::Cancelled);
                }
                state => self.last_state = state,
            }
        }

        error!(
            job_id = %self.job_id,
            attempts = self.attempts,
            last_state = %self.last_state,
            "Search job took too long. Quit waiting."
        );
        Ok(PollEnd::TimedOut)
    }

    async fn collect(&self, end: PollEnd) -> Result<JobOutcome> {
        let mut records = self.client.fetch_records(&self.job_id).await?;
        format_timeslices(&mut records);

        debug!(
            job_id = %self.job_id,
            rows = records.len(),
            outcome = end.label(),
            "Search job records collected"
        );

        Ok(JobOutcome {
            records,
            completed: end == PollEnd::Complete,
        })
    }

    /// Best-effort delete of the server-side job.
    async fn release(&self) {
        let client = self.client;
        match endpoints::delete_job(
            &client.http,
            &client.endpoint,
            &client.credentials,
            &self.job_id,
            client.max_retries,
            client.metrics.as_ref(),
        )
        .await
        {
            Ok(()) => debug!(job_id = %self.job_id, "Released search job"),
            Err(e) => warn!(job_id = %self.job_id, error = %e, "Failed to delete search job"),
        }
    }
}

impl Drop for RunningQuery<'_> {
    fn drop(&mut self) {
        if self.settled || self.last_state == JobState::Complete {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(job_id = %self.job_id, "No runtime left to delete abandoned search job");
            return;
        };

        let client = self.client;
        if let Some(m) = &client.metrics {
            m.record_job_outcome("abandoned", 0);
        }
        debug!(job_id = %self.job_id, attempts = self.attempts, "Search job abandoned mid-poll");

        let http = client.http.clone();
        let endpoint = client.endpoint.clone();
        let credentials = client.credentials.clone();
        let job_id = std::mem::take(&mut self.job_id);
        let max_retries = client.max_retries;
        let metrics = client.metrics.clone();

        let task = runtime.spawn(async move {
            match endpoints::delete_job(
                &http,
                &endpoint,
                &credentials,
                &job_id,
                max_retries,
                metrics.as_ref(),
            )
            .await
            {
                Ok(()) => debug!(job_id = %job_id, "Released abandoned search job"),
                Err(e) => warn!(job_id = %job_id, error = %e, "Failed to delete abandoned search job"),
            }
        });
        client.track_release(task);
    }
}

fn outcome_label(result: &Result<JobOutcome>, last_state: JobState) -> &'static str {
    match result {
        Ok(outcome) if outcome.completed => PollEnd::Complete.label(),
        Ok(_) if last_state == JobState::Cancelled => PollEnd::Cancelled.label(),
        Ok(_) => PollEnd::TimedOut.label(),
        Err(_) => "failed",
    }
}
