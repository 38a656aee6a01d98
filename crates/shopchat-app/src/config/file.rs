use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file inside ~/.shopchat
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Optional settings read from `config.toml`. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Backend base address
    pub api_base: Option<String>,
    /// Where the session id is persisted
    pub storage_path: Option<PathBuf>,
    /// Overall HTTP timeout; unset means no client-side timeout
    pub timeout_secs: Option<u64>,
    /// Keep a JSONL transcript of every conversation
    pub log_conversation: Option<bool>,
}

impl FileConfig {
    /// Load config from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load an explicitly requested file, or the default one when it exists.
    ///
    /// An explicit path must exist; a missing default file yields empty settings.
    pub fn load(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self> {
        match (explicit, default_path) {
            (Some(path), _) => Self::load_from_file(path),
            (None, Some(path)) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}
