//! Search command implementation.
//!
//! Responsibilities:
//! - Run one search job through `SumoClient::query` and render its records.
//! - Drive the stderr progress bar while the job is polled.
//!
//! Does NOT handle:
//! - Polling, pagination or job cleanup (all in `sumo_client`); on Ctrl+C it
//!   only waits for the client to finish deleting the abandoned job.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use sumo_client::SearchOptions;
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};
use crate::commands::CommandContext;
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::SearchProgress;

/// How long Ctrl+C waits for the abandoned job's delete.
const RELEASE_GRACE: Duration = Duration::from_secs(5);

pub(crate) struct SearchArgs {
    pub query: String,
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
    pub time_zone: Option<String>,
    pub show_progress: bool,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::new();
        if let Some(from) = self.from {
            options = options.with_from(from);
        }
        if let Some(to) = self.to {
            options = options.with_to(to);
        }
        if let Some(tz) = &self.time_zone {
            options = options.with_time_zone(tz.clone());
        }
        options
    }
}

pub(crate) async fn run(
    ctx: CommandContext,
    args: SearchArgs,
    output_format: OutputFormat,
    output_file: Option<PathBuf>,
    cancel: &CancellationToken,
) -> Result<()> {
    info!(query = %args.query, "Executing search");

    let progress = args
        .show_progress
        .then(|| Arc::new(SearchProgress::new("Search job")));
    let client = ctx.client(
        progress
            .clone()
            .map(|p| p as Arc<dyn sumo_client::PollProgress>),
    )?;

    let mut query = Box::pin(client.query(&args.query, args.options()));
    let finished = tokio::select! {
        result = &mut query => Some(result),
        _ = cancel.cancelled() => None,
    };
    let Some(result) = finished else {
        // Dropping the query hands its job delete to a spawned task.
        drop(query);
        client.finish_releases(RELEASE_GRACE).await;
        return Err(Cancelled.into());
    };
    let records = result.context("Failed to run search")?;

    if let Some(progress) = &progress {
        progress.finish();
    }
    info!(records = records.len(), "Search finished");

    let formatter = get_formatter(output_format);
    let output = formatter.format_records(&records)?;
    output_result(&output, output_file.as_deref())
}
