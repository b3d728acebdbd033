//! Command handlers.

pub mod metrics;
pub mod search;
pub mod setup;

use std::sync::Arc;

use anyhow::{Context, Result};
use sumo_client::{MetricsCollector, PollProgress, SumoClient};
use sumo_config::Config;

/// Shared settings every API command needs besides its own arguments.
pub(crate) struct CommandContext {
    pub config: Config,
    /// Record API metrics (set when a Prometheus exporter is running).
    pub metrics: bool,
}

impl CommandContext {
    /// Build a client from the resolved config.
    pub(crate) fn client(&self, progress: Option<Arc<dyn PollProgress>>) -> Result<SumoClient> {
        let mut builder = SumoClient::builder().from_config(&self.config);
        if let Some(progress) = progress {
            builder = builder.progress(progress);
        }
        if self.metrics {
            builder = builder.metrics(MetricsCollector::new());
        }
        builder.build().context("Failed to build Sumo Logic client")
    }
}
