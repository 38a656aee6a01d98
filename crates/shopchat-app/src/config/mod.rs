pub mod file;

use anyhow::{bail, Result};
use shopchat_gateway::{resolve_api_base, API_BASE_ENV};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
pub use file::{FileConfig, CONFIG_FILE_NAME};

/// Name of the session storage file inside ~/.shopchat
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Where the session id lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// In memory for the lifetime of the process
    Ephemeral,
    File(PathBuf),
}

/// Effective settings after merging CLI flags, environment, config file and
/// defaults, in that order of precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub storage: StorageTarget,
    pub timeout: Option<Duration>,
    pub log_conversation: bool,
    pub verbose: bool,
}

impl Settings {
    /// `base_dir` is the ~/.shopchat directory, if one could be determined.
    pub fn resolve(cli: &Cli, file: &FileConfig, base_dir: Option<&Path>) -> Result<Self> {
        let explicit_base = cli
            .api_base
            .clone()
            .or_else(|| env::var(API_BASE_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .or_else(|| file.api_base.clone());
        let api_base = resolve_api_base(explicit_base.as_deref());

        let storage = if cli.ephemeral {
            StorageTarget::Ephemeral
        } else if let Some(path) = cli.storage.clone().or_else(|| file.storage_path.clone()) {
            StorageTarget::File(path)
        } else if let Some(dir) = base_dir {
            StorageTarget::File(dir.join(STORAGE_FILE_NAME))
        } else {
            bail!("Cannot locate a home directory for session storage; pass --storage <PATH> or --ephemeral");
        };

        Ok(Self {
            api_base,
            storage,
            timeout: file.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
            log_conversation: cli.log_conversation || file.log_conversation.unwrap_or(false),
            verbose: cli.verbose,
        })
    }
}
