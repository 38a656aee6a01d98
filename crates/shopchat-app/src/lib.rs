//! ShopChat terminal client: CLI parsing, configuration, the interactive
//! REPL and one-shot commands on top of [`shopchat_chat::ShopChat`].

pub mod app;
pub mod cli;
pub mod config;
pub mod render;

pub use app::{run, AppContext};
pub use cli::{CartCommands, Cli, Commands};
pub use config::{FileConfig, Settings, StorageTarget};
