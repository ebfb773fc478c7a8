//! Error handling and display for the CLI.

use colored::Colorize;
use hoist_provision::{AutoScalerPolicy, ProvisionError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("document has no autoScaler section")]
    NoAutoScaler,

    #[error("{0} is an autoscaler policy, expected a worker behavior config")]
    NotABehaviorConfig(String),

    #[error("no worker version given")]
    MissingVersion,
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::MissingVersion => {
                eprintln!(
                    "\n{}",
                    "Hint: Pass --version or set HOIST_WORKER_VERSION.".yellow()
                );
            }
            CliError::NotABehaviorConfig(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Wrap the policy as {\"autoScaler\": ...} to select workers.".yellow()
                );
            }
            CliError::NoAutoScaler => {}
        }
    }

    if err
        .downcast_ref::<ProvisionError>()
        .is_some_and(ProvisionError::is_unsupported_provider)
    {
        let supported: Vec<_> = AutoScalerPolicy::supported_provider_types().collect();
        eprintln!(
            "\n{}",
            format!("Hint: Supported provider types: {}", supported.join(", ")).yellow()
        );
    }
}
