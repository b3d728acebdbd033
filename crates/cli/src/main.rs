//! Sumo Logic CLI - search jobs and metrics queries from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Resolve configuration from flags, `SUMOLOGIC_*` variables, `.env` and the credentials file.
//! - Set up logging, optional trace export and the optional Prometheus exporter.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Search job or metrics API logic (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can supply clap env defaults.
//! - Results go to stdout; logs, progress and errors go to stderr.

mod args;
mod cancellation;
mod commands;
mod dispatch;
mod error;
mod formatters;
mod progress;

use std::time::Duration;

use anyhow::Context;
use args::{Cli, resolve_config_path};
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use commands::CommandContext;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use sumo_client::{MetricsExporter, TracingConfig};
use sumo_config::{Config, ConfigLoader};

/// Resolve configuration. CLI flags win over env vars, which win over the credentials file.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();

    if let Some(path) = resolve_config_path(cli.config_path.clone()) {
        loader = loader.with_config_path(path);
    }
    if let Some(endpoint) = &cli.endpoint {
        loader = loader.with_endpoint(endpoint.clone());
    }
    if let Some(id) = &cli.access_id {
        loader = loader.with_access_id(id.clone());
    }
    if let Some(key) = &cli.access_key {
        loader = loader.with_access_key(key.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if let Some(attempts) = cli.max_job_wait {
        loader = loader.with_max_job_wait(attempts);
    }
    if let args::Commands::Search {
        limit: Some(limit), ..
    } = &cli.command
    {
        loader = loader.with_record_limit(*limit);
    }

    loader
        .from_env()
        .context("Failed to load configuration from environment")?
        .from_credentials_file()
        .context("Failed to read credentials file")?
        .build()
        .context("Failed to build configuration")
}

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::new().with_log_format(cli.log_format.into());
    if let Some(endpoint) = &cli.otlp_endpoint {
        tracing_config = tracing_config.with_otlp_endpoint(endpoint);
    }
    let tracing_guard = match tracing_config.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let _metrics_exporter = match cli.metrics_bind.as_deref() {
        Some(bind_addr) => match MetricsExporter::install(bind_addr) {
            Ok(exporter) => Some(exporter),
            Err(e) => {
                eprintln!("Failed to start metrics exporter: {}", e);
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        },
        None => None,
    };

    let ctx = if cli.command.needs_connection() {
        match load_config(&cli) {
            Ok(config) => Some(CommandContext {
                config,
                metrics: _metrics_exporter.is_some(),
            }),
            Err(e) => {
                eprintln!("{:#}", e);
                tracing_guard.shutdown();
                std::process::exit(e.exit_code().as_i32());
            }
        }
    } else {
        None
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, ctx, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    tracing_guard.shutdown();
    std::process::exit(exit_code.as_i32());
}
