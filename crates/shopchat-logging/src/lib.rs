//! JSONL conversation transcripts and HTTP request tracing for shopchat

pub mod conversation_logger;
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use conversation_logger::ConversationLogger;
pub use request_logger::{log_failure, log_request, log_response};

/// Shorten `s` to at most `max_chars` characters, ending in "..." when cut
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// `~/.shopchat`, without touching the filesystem
pub fn shopchat_dir_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;
    Ok(PathBuf::from(home).join(".shopchat"))
}

/// `~/.shopchat`, created on first use
pub fn get_shopchat_dir() -> Result<PathBuf> {
    let dir = shopchat_dir_path()?;
    std::fs::create_dir_all(&dir).context("Failed to create shopchat directory")?;
    Ok(dir)
}

/// Transcript directory, `~/.shopchat/logs`
pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_shopchat_dir()?.join("logs");
    std::fs::create_dir_all(&dir).context("Failed to create logs directory")?;
    Ok(dir)
}
