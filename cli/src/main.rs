//! composer-provision - Provision PHP Composer installations

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use composer_provision::cli::Cli;
use composer_provision::domain::InstallationError;
use composer_provision::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if json_mode && let Ok(out) = json::format_error(&format!("{e:#}"), error_code(&e)) {
                println!("{out}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Stable machine-readable code for `--json` error objects.
fn error_code(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<InstallationError>() {
        Some(InstallationError::NotFound(_)) => "INSTALLATION_NOT_FOUND",
        Some(InstallationError::InvalidName(_)) => "INVALID_ARGUMENT",
        None => "COMMAND_FAILED",
    }
}
