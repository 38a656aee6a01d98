use anyhow::{bail, Context, Result};
use colored::Colorize;
use shopchat_chat::{Outcome, ShopChat};
use shopchat_gateway::{Backend, ImageInput};
use shopchat_logging::{get_logs_dir, ConversationLogger};
use shopchat_types::{CartItem, Message, Role};
use std::future::Future;
use std::time::Duration;

use crate::cli::{CartCommands, Commands};
use crate::render;

/// How long a call may run before the typing indicator shows up
const TYPING_DELAY: Duration = Duration::from_millis(400);

/// A user action that results in one gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Chat(String),
    Image { source: String, query: Option<String> },
    /// 0-based index into the displayed results
    AddToCart(usize),
    ViewCart,
    /// 0-based index into the cart
    RemoveFromCart(usize),
    Checkout,
    Reset,
}

impl Action {
    /// Map a one-shot subcommand; `None` for commands that make no gateway call
    pub fn from_command(command: &Commands) -> Result<Option<Self>> {
        let action = match command {
            Commands::Chat { query } => Action::Chat(query.join(" ")),
            Commands::Image { source, query } => Action::Image {
                source: source.clone(),
                query: query.clone(),
            },
            Commands::Cart { command } => match command {
                CartCommands::View => Action::ViewCart,
                CartCommands::Add { number } => Action::AddToCart(position_to_index(*number)?),
                CartCommands::Remove { number } => Action::RemoveFromCart(position_to_index(*number)?),
                CartCommands::Checkout => Action::Checkout,
            },
            Commands::Reset => Action::Reset,
            Commands::Session | Commands::Ping | Commands::Completions { .. } => return Ok(None),
        };
        Ok(Some(action))
    }

    /// Cart operations show the cart panel after a successful reply
    pub fn touches_cart(&self) -> bool {
        matches!(
            self,
            Action::AddToCart(_) | Action::ViewCart | Action::RemoveFromCart(_) | Action::Checkout
        )
    }
}

/// Convert an on-screen number (`#1`, `#2`, ...) to a 0-based index
pub fn position_to_index(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Item numbers start at 1"),
    }
}

/// Run `action` against the controller.
///
/// Gateway failures come back as [`Outcome::Failed`]; only local problems
/// such as an unreadable image file are returned as errors.
pub async fn perform<B: Backend>(chat: &ShopChat<B>, action: &Action) -> Result<Outcome> {
    let outcome = match action {
        Action::Chat(text) => match chat.submit(text).await {
            Some(outcome) => outcome,
            None => bail!("Nothing to send: the message is empty"),
        },
        Action::Image { source, query } => {
            let image = ImageInput::resolve(source).with_context(|| format!("Cannot use image '{}'", source))?;
            chat.send_image(&image, query.as_deref()).await
        }
        Action::AddToCart(index) => chat.add_to_cart(*index).await,
        Action::ViewCart => chat.view_cart().await,
        Action::RemoveFromCart(index) => chat.remove_from_cart(*index).await,
        Action::Checkout => chat.checkout().await,
        Action::Reset => chat.reset_session().await,
    };
    Ok(outcome)
}

/// Messages produced by `action`, given the message count before it ran.
///
/// A successful reset replaces the whole log, so all of it is new.
pub fn fresh_messages<B: Backend>(chat: &ShopChat<B>, action: &Action, before: usize, outcome: &Outcome) -> Vec<Message> {
    if matches!(action, Action::Reset) && outcome.is_applied() {
        chat.messages()
    } else {
        chat.messages_since(before)
    }
}

/// Await `fut`, printing a typing line if it takes noticeably long
pub async fn with_typing_indicator<F: Future>(fut: F) -> F::Output {
    tokio::pin!(fut);
    tokio::select! {
        output = &mut fut => output,
        _ = tokio::time::sleep(TYPING_DELAY) => {
            println!("{}", "ShopAI is typing...".bright_black().italic());
            fut.await
        }
    }
}

/// Prints new messages and mirrors them into the optional JSONL log
pub struct Transcript {
    logger: Option<ConversationLogger>,
}

impl Transcript {
    /// Open the conversation log when `enabled`; failures only disable logging
    pub async fn open(enabled: bool) -> Self {
        if !enabled {
            return Self { logger: None };
        }
        let logger = match get_logs_dir() {
            Ok(dir) => ConversationLogger::new(&dir).await,
            Err(e) => Err(e),
        };
        match logger {
            Ok(logger) => {
                println!(
                    "{}",
                    format!("📝 Logging conversation to {}", logger.file_path().display()).bright_black()
                );
                Self { logger: Some(logger) }
            }
            Err(e) => {
                eprintln!("{} Logging disabled: {:#}", "⚠️".yellow(), e);
                Self { logger: None }
            }
        }
    }

    /// Print `messages`; user messages are skipped on screen when `echo_user`
    /// is false because the user just typed them.
    pub async fn show(&mut self, session_id: &str, messages: &[Message], echo_user: bool, cart: &[CartItem]) {
        for message in messages {
            if echo_user || message.role != Role::User {
                println!("{}\n", render::format_message(message));
            }
            if let Some(logger) = &mut self.logger {
                let cart_size = (message.role == Role::Assistant).then_some(cart.len());
                logger.log_with_cart(session_id, message, cart_size).await;
            }
        }
    }

    /// Flush and close the log
    pub async fn close(&mut self) {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }
}

/// Perform one action and present its result; returns the outcome
pub async fn run_action<B: Backend>(
    chat: &ShopChat<B>,
    transcript: &mut Transcript,
    action: &Action,
    echo_user: bool,
) -> Result<Outcome> {
    let before = chat.message_count();
    let outcome = with_typing_indicator(perform(chat, action)).await?;

    let messages = fresh_messages(chat, action, before, &outcome);
    let cart = chat.cart();
    transcript.show(&chat.session_id(), &messages, echo_user, &cart).await;

    if action.touches_cart() && outcome.is_applied() {
        println!("{}\n", render::format_cart(&cart));
    }
    if matches!(action, Action::Reset) && outcome.is_applied() {
        println!(
            "{}\n",
            format!("New session: {}", render::short_session_id(&chat.session_id())).bright_black()
        );
    }
    Ok(outcome)
}
