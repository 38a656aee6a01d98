pub mod actions;
pub mod commands;
pub mod repl;
pub mod setup;

use anyhow::Result;
use clap::CommandFactory;
use std::io;

use crate::cli::{Cli, Commands};

pub use commands::run_command;
pub use repl::run_repl_mode;
pub use setup::{build_context, settings_from_cli, setup_from_cli, AppContext};

/// Dispatch a parsed command line. Returns false when a one-shot backend
/// call failed, so the binary can exit non-zero.
pub async fn run(cli: Cli) -> Result<bool> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "shopchat", &mut io::stdout());
        return Ok(true);
    }

    let ctx = setup_from_cli(&cli)?;
    match &cli.command {
        Some(command) => run_command(&ctx, command).await,
        None => {
            run_repl_mode(&ctx).await?;
            Ok(true)
        }
    }
}
