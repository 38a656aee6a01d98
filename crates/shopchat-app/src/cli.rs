use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for shopchat
#[derive(Parser, Debug)]
#[command(name = "shopchat")]
#[command(about = "ShopChat - conversational shopping assistant in your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base address of the commerce backend (e.g., http://localhost:8000)
    #[arg(long, global = true, value_name = "URL", env = "SHOPCHAT_API_BASE")]
    pub api_base: Option<String>,

    /// File holding the persisted session id (default: ~/.shopchat/storage.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// Path to config file (default: ~/.shopchat/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "SHOPCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep the session id in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Write the conversation to ~/.shopchat/logs as JSONL
    #[arg(long, global = true)]
    pub log_conversation: bool,

    /// Enable verbose debug output (shows HTTP requests and responses)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Send one free-text message to the assistant
    Chat {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Find products similar to an image (http(s) URL or local file)
    Image {
        /// Image URL or path to a local image file
        source: String,
        /// What to look for; defaults to "Find similar products"
        #[arg(short = 'q', long)]
        query: Option<String>,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Start a fresh session with an empty conversation and cart
    Reset,
    /// Print the active session id
    Session,
    /// Check that the backend is awake
    Ping,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CartCommands {
    /// Show the cart contents
    View,
    /// Add a product by the number shown next to it (1-based)
    Add {
        number: usize,
    },
    /// Remove a cart entry by its number (1-based)
    Remove {
        number: usize,
    },
    /// Check out the cart
    Checkout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["shopchat", "--ephemeral"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(cli.ephemeral);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_chat_collects_words() {
        let cli = Cli::try_parse_from(["shopchat", "chat", "running", "shoes", "under", "$100"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Chat {
                query: vec!["running".into(), "shoes".into(), "under".into(), "$100".into()]
            })
        );
    }

    #[test]
    fn test_chat_requires_text() {
        assert!(Cli::try_parse_from(["shopchat", "chat"]).is_err());
    }

    #[test]
    fn test_cart_subcommands() {
        let cli = Cli::try_parse_from(["shopchat", "cart", "add", "2"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Cart { command: CartCommands::Add { number: 2 } }));

        let cli = Cli::try_parse_from(["shopchat", "cart", "checkout"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Cart { command: CartCommands::Checkout }));

        assert!(Cli::try_parse_from(["shopchat", "cart", "add", "two"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shopchat",
            "image",
            "https://cdn.example/lamp.jpg",
            "--query",
            "cheaper",
            "--api-base",
            "http://localhost:8000",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:8000"));
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Image {
                source: "https://cdn.example/lamp.jpg".into(),
                query: Some("cheaper".into()),
            })
        );
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::try_parse_from(["shopchat", "completions", "zsh"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Completions { shell: Shell::Zsh }));
        assert!(Cli::try_parse_from(["shopchat", "completions", "cmd.exe"]).is_err());
    }
}
