use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use shopchat_types::Message;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    session_id: &'a str,
    role: String,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_names: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cart_size: Option<usize>,
}

/// Append-only JSONL transcript of a conversation
pub struct ConversationLogger {
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger in `logs_dir`; the file name is based on the current local time.
    pub async fn new(logs_dir: &Path) -> Result<Self> {
        fs::create_dir_all(logs_dir).await?;

        let now_local = Local::now();
        let filename = format!(
            "shopchat-{}.jsonl",
            now_local.format("%Y-%m-%d-%H%M%S")
        );
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self { file_path, file: Some(file) })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append a message together with the cart size that came with it
    pub async fn log_with_cart(&mut self, session_id: &str, message: &Message, cart_size: Option<usize>) {
        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            session_id,
            role: message.role.to_string(),
            content: &message.text,
            product_names: message
                .products
                .as_ref()
                .map(|products| products.iter().map(|p| p.product_name.as_str()).collect()),
            cart_size,
        };
        let Some(file) = &mut self.file else {
            return;
        };
        let mut line = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize conversation entry: {}", e);
                return;
            }
        };
        line.push('\n');
        if let Err(e) = file.write_all(line.as_bytes()).await {
            log::warn!("Could not write conversation log {}: {}", self.file_path.display(), e);
            return;
        }
        if let Err(e) = file.flush().await {
            log::warn!("Could not flush conversation log: {}", e);
        }
    }

    /// Sync and close the file; later writes are ignored
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
