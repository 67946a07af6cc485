//! StreamHub CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use streamhub_core::config::AppConfig;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, cli.env.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(&config).await {
        output::print_app_error(&e);
        std::process::exit(commands::exit_code(&e));
    }
}

/// Initialize the tracing subscriber from `[logging]`; `RUST_LOG` wins.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
