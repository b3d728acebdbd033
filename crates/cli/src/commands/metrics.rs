//! Metrics command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sumo_client::TimeRange;
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};
use crate::commands::CommandContext;
use crate::formatters::{OutputFormat, get_formatter, output_result};

/// Default lookback when `--from` is not given.
const DEFAULT_METRICS_WINDOW_HOURS: i64 = 1;

pub(crate) struct MetricsArgs {
    pub queries: Vec<String>,
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl MetricsArgs {
    fn time_range(&self, now: DateTime<Utc>) -> TimeRange {
        let to = self.to.map(|t| t.with_timezone(&Utc)).unwrap_or(now);
        let from = self
            .from
            .map(|f| f.with_timezone(&Utc))
            .unwrap_or_else(|| to - Duration::hours(DEFAULT_METRICS_WINDOW_HOURS));
        TimeRange::between(from, to)
    }
}

pub(crate) async fn run(
    ctx: CommandContext,
    args: MetricsArgs,
    output_format: OutputFormat,
    output_file: Option<PathBuf>,
    cancel: &CancellationToken,
) -> Result<()> {
    if args.queries.iter().all(|q| q.trim().is_empty()) {
        anyhow::bail!("At least one non-empty metrics query is required");
    }
    info!(queries = args.queries.len(), "Executing metrics query");

    let client = ctx.client(None)?;
    let time_range = args.time_range(Utc::now());

    let response = tokio::select! {
        result = client.metrics_query(args.queries.iter().map(String::as_str), time_range) => {
            result.context("Failed to run metrics query")?
        }
        _ = cancel.cancelled() => return Err(Cancelled.into()),
    };

    let formatter = get_formatter(output_format);
    let output = formatter.format_metrics(&response)?;
    output_result(&output, output_file.as_deref())
}
