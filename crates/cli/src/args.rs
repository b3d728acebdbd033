//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse RFC 3339 time arguments.
//! - Provide config path resolution helpers.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read `SUMOLOGIC_*` connection variables; `sumo_config::ConfigLoader` does.

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "sumo-cli")]
#[command(about = "Sumo Logic CLI - Run search jobs and metrics queries", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  sumo-cli setup\n  sumo-cli search '_sourceCategory=prod | count by _sourceHost'\n  sumo-cli search 'error | timeslice 5m | count by _timeslice' --from 2024-01-01T00:00:00Z --to 2024-01-01T06:00:00Z -o csv\n  sumo-cli metrics 'metric=CPU_Total | avg by _sourceHost'\n"
)]
pub struct Cli {
    /// API endpoint of your deployment (e.g., https://api.eu.sumologic.com/api/v1)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Access ID
    #[arg(long, global = true)]
    pub access_id: Option<String>,

    /// Access key
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Path to the credentials file (overrides default location)
    #[arg(long, global = true, value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Number of status polls before a search job is abandoned
    #[arg(long, global = true)]
    pub max_job_wait: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// OTLP collector endpoint for trace export (e.g., http://localhost:4317)
    #[arg(long, global = true, env = "SUMOLOGIC_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for sumo_client::LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => sumo_client::LogFormat::Text,
            LogFormatArg::Json => sumo_client::LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a search job and print its aggregate records
    Search {
        /// The search query (e.g., '_sourceCategory=prod | count by _sourceHost')
        query: String,

        /// Start of the search window (RFC 3339). Defaults to 24 hours before --to
        #[arg(long, value_parser = parse_rfc3339)]
        from: Option<DateTime<FixedOffset>>,

        /// End of the search window (RFC 3339). Defaults to now
        #[arg(long, value_parser = parse_rfc3339)]
        to: Option<DateTime<FixedOffset>>,

        /// Time zone the backend uses to interpret the query (e.g., 'America/New_York')
        #[arg(long)]
        time_zone: Option<String>,

        /// Maximum number of records to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Do not draw the polling progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Run a metrics query and print the raw response
    Metrics {
        /// One or more metrics queries; row ids are assigned A, B, C, ...
        #[arg(required = true)]
        queries: Vec<String>,

        /// Start of the query window (RFC 3339). Defaults to 1 hour before --to
        #[arg(long, value_parser = parse_rfc3339)]
        from: Option<DateTime<FixedOffset>>,

        /// End of the query window (RFC 3339). Defaults to now
        #[arg(long, value_parser = parse_rfc3339)]
        to: Option<DateTime<FixedOffset>>,
    },

    /// Save access credentials to the credentials file.
    ///
    /// Values not given with --access-id/--access-key are prompted for.
    Setup,
}

impl Commands {
    /// Whether the command talks to the API and therefore needs a full `Config`.
    pub fn needs_connection(&self) -> bool {
        !matches!(self, Commands::Setup)
    }
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-01-01T00:00:00Z: {e}"))
}

/// Returns true if the path is empty or contains only whitespace.
pub(crate) fn path_is_blank(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}

/// Drop blank `--config-path` values so they cannot clobber the environment.
pub fn resolve_config_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !path_is_blank(p))
}
