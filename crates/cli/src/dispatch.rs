//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).
//!
//! Invariants:
//! - API commands receive a resolved `CommandContext`; `setup` never needs one.

use anyhow::{Result, bail};

use crate::args::{Cli, Commands, resolve_config_path};
use crate::cancellation::CancellationToken;
use crate::commands::{self, CommandContext};

pub(crate) async fn run_command(
    cli: Cli,
    ctx: Option<CommandContext>,
    cancel_token: &CancellationToken,
) -> Result<()> {
    match cli.command {
        Commands::Setup => {
            commands::setup::run(
                cli.access_id,
                cli.access_key,
                resolve_config_path(cli.config_path),
            )?;
        }
        Commands::Search {
            query,
            from,
            to,
            time_zone,
            limit: _,
            no_progress,
        } => {
            let Some(ctx) = ctx else {
                bail!("Internal error: search requires a resolved configuration");
            };
            commands::search::run(
                ctx,
                commands::search::SearchArgs {
                    query,
                    from,
                    to,
                    time_zone,
                    show_progress: !no_progress,
                },
                cli.output,
                cli.output_file,
                cancel_token,
            )
            .await?;
        }
        Commands::Metrics { queries, from, to } => {
            let Some(ctx) = ctx else {
                bail!("Internal error: metrics requires a resolved configuration");
            };
            commands::metrics::run(
                ctx,
                commands::metrics::MetricsArgs { queries, from, to },
                cli.output,
                cli.output_file,
                cancel_token,
            )
            .await?;
        }
    }

    Ok(())
}
