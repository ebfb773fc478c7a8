//! hoistctl - offline tool for hoist worker configuration
//!
//! Validates autoscaler and worker behavior documents, renders user data,
//! and dry-runs worker selection and region binding without touching a
//! cloud provider.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod document;
mod error;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::from_env()?;

    init_tracing(&config);

    if let Err(e) = cli.run(&config) {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing (prefer RUST_LOG, fall back to HOIST_LOG_LEVEL).
fn init_tracing(config: &config::Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());

    // Logs go to stderr so command output stays machine readable.
    match config.log_format {
        config::LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        config::LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
