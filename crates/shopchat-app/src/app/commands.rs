use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::actions::{run_action, Action, Transcript};
use crate::app::setup::AppContext;
use crate::cli::Commands;

/// Execute a one-shot subcommand; returns false when the backend call failed
pub async fn run_command(ctx: &AppContext, command: &Commands) -> Result<bool> {
    let chat = &ctx.chat;

    match command {
        Commands::Session => {
            println!("{}", chat.session_id());
            Ok(true)
        }
        Commands::Ping => {
            let status = chat
                .gateway()
                .backend()
                .ping()
                .await
                .with_context(|| format!("Backend at {} did not respond", ctx.settings.api_base))?;
            println!("{} {} {}", "✅".green(), ctx.settings.api_base, status);
            Ok(true)
        }
        other => {
            let Some(action) = Action::from_command(other)? else {
                return Ok(true);
            };
            let mut transcript = Transcript::open(ctx.settings.log_conversation).await;
            let echo_user = !matches!(action, Action::Chat(_));
            let outcome = run_action(chat, &mut transcript, &action, echo_user).await;
            transcript.close().await;
            Ok(outcome?.is_applied())
        }
    }
}
