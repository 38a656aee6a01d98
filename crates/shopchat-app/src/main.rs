use clap::Parser;
use std::process::ExitCode;

use shopchat::{render, Cli};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", render::panic_diagnostic(info));
    }));

    match shopchat::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::debug!("Fatal error: {:?}", e);
            eprintln!("{}", render::failure_diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}
