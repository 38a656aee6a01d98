use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::app::actions::{run_action, Action, Transcript};
use crate::app::setup::AppContext;
use crate::render;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    Session,
    Run(Action),
    /// Malformed command; the text explains the correct usage
    Invalid(String),
}

impl ReplCommand {
    /// Parse a line; blank lines yield `None`.
    ///
    /// Anything that is not a slash command or `exit`/`quit` goes to the
    /// assistant verbatim, including `#N` references and "view cart".
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "exit" || trimmed == "quit" {
            return Some(ReplCommand::Exit);
        }
        if !trimmed.starts_with('/') {
            return Some(ReplCommand::Run(Action::Chat(trimmed.to_string())));
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match name {
            "/help" => ReplCommand::Help,
            "/session" => ReplCommand::Session,
            "/cart" => ReplCommand::Run(Action::ViewCart),
            "/checkout" => ReplCommand::Run(Action::Checkout),
            "/reset" => ReplCommand::Run(Action::Reset),
            "/add" => match parse_number(rest) {
                Some(index) => ReplCommand::Run(Action::AddToCart(index)),
                None => usage("/add N", "N is the number shown next to the product"),
            },
            "/remove" => match parse_number(rest) {
                Some(index) => ReplCommand::Run(Action::RemoveFromCart(index)),
                None => usage("/remove N", "N is the number shown in the cart"),
            },
            "/image" => {
                let (source, query) = match rest.split_once(char::is_whitespace) {
                    Some((source, query)) => (source, Some(query.trim().to_string())),
                    None => (rest, None),
                };
                if source.is_empty() {
                    usage("/image <url-or-path> [query]", "e.g. /image https://example.com/shoe.jpg in red")
                } else {
                    ReplCommand::Run(Action::Image {
                        source: source.to_string(),
                        query: query.filter(|q| !q.is_empty()),
                    })
                }
            }
            other => ReplCommand::Invalid(format!("Unknown command '{}'. Type /help for the list.", other)),
        };
        Some(command)
    }
}

fn usage(syntax: &str, hint: &str) -> ReplCommand {
    ReplCommand::Invalid(format!("Usage: {} ({})", syntax, hint))
}

/// 1-based on-screen number, optionally written as `#N`, to a 0-based index
fn parse_number(arg: &str) -> Option<usize> {
    arg.trim_start_matches('#').parse::<usize>().ok()?.checked_sub(1)
}

/// Run interactive REPL mode
pub async fn run_repl_mode(ctx: &AppContext) -> Result<()> {
    let chat = &ctx.chat;

    println!("{}\n", render::banner(&chat.session_id(), &ctx.settings.api_base));

    let mut transcript = Transcript::open(ctx.settings.log_conversation).await;
    transcript.show(&chat.session_id(), &chat.messages(), true, &chat.cart()).await;

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let Some(command) = ReplCommand::parse(&line) else {
                    continue;
                };
                if let Err(e) = rl.add_history_entry(line.trim()) {
                    log::debug!("Could not record history: {}", e);
                }

                match command {
                    ReplCommand::Exit => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    ReplCommand::Help => println!("{}\n", render::help_text()),
                    ReplCommand::Session => println!(
                        "{} Session {} • Backend {}\n",
                        "🔑".bright_cyan(),
                        chat.session_id(),
                        ctx.settings.api_base
                    ),
                    ReplCommand::Invalid(message) => eprintln!("{} {}\n", "❌".bright_red(), message),
                    ReplCommand::Run(action) => {
                        let echo_user = !matches!(action, Action::Chat(_));
                        if let Err(e) = run_action(chat, &mut transcript, &action, echo_user).await {
                            eprintln!("{} {:#}\n", "❌".bright_red(), e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    transcript.close().await;
    Ok(())
}
