use anyhow::{Context, Result};
use shopchat_chat::ShopChat;
use shopchat_gateway::{Gateway, HttpBackend};
use shopchat_logging::shopchat_dir_path;
use shopchat_session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::{FileConfig, Settings, StorageTarget, CONFIG_FILE_NAME};

/// Everything a run needs: resolved settings and a ready controller
pub struct AppContext {
    pub settings: Settings,
    pub chat: ShopChat<HttpBackend>,
}

/// Resolve configuration from CLI arguments, environment and config file.
///
/// Nothing is created here; the storage file's directory appears on the
/// first write.
pub fn settings_from_cli(cli: &Cli) -> Result<Settings> {
    let base_dir = match shopchat_dir_path() {
        Ok(dir) => Some(dir),
        Err(e) => {
            log::warn!("No shopchat directory available: {:#}", e);
            None
        }
    };
    let default_config = base_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME));

    let file = FileConfig::load(cli.config.as_deref(), default_config.as_deref())?;
    Settings::resolve(cli, &file, base_dir.as_deref())
}

/// Build the session store, HTTP backend and controller for `settings`
pub fn build_context(settings: Settings) -> Result<AppContext> {
    let store: Arc<dyn SessionStore> = match &settings.storage {
        StorageTarget::Ephemeral => Arc::new(MemorySessionStore::new()),
        StorageTarget::File(path) => {
            log::debug!("Session storage: {}", path.display());
            Arc::new(FileSessionStore::new(path))
        }
    };

    let backend = HttpBackend::new(&settings.api_base, settings.timeout, settings.verbose)
        .with_context(|| format!("Failed to set up HTTP client for {}", settings.api_base))?;
    let chat = ShopChat::new(Gateway::new(backend), SessionManager::new(store));

    Ok(AppContext { settings, chat })
}

/// Set up application context from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppContext> {
    build_context(settings_from_cli(cli)?)
}
