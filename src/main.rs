mod api;
mod app;
mod cli;
mod client;
mod config;
mod consts;
mod error;
mod output;
mod router;
mod session;
mod storage;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::Config;

fn init_logging(debug: bool) {
    let default = if debug { "legalqa=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Load config file and merge with CLI args (CLI takes precedence)
    let config = Config::load();
    let cli = cli.with_config(&config);

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Pipeline failures were already shown by the notifier
            if !e.already_reported() {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}
