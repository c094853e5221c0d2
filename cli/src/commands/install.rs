//! `composer-provision install` — make sure an installation is present and fresh.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::install::{InstallOptions, InstallResult, ensure_installed};
use crate::commands::{Resolved, process_env, resolve};
use crate::infra::clock::SystemClock;
use crate::infra::install_dir::LocalInstallDir;
use crate::output::{TerminalReporter, json};

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Installation name
    pub name: String,
}

/// Run the install command.
///
/// Composer command failures are reported as warnings; the exit code is
/// non-zero only when the installation could not be set up at all.
///
/// # Errors
///
/// Returns an error if the name is unknown or the installer cannot be fetched
/// into an empty directory.
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<ExitCode> {
    let resolved = resolve(app, &args.name, &process_env())?;
    let result = install_resolved(app, &resolved).await?;

    if app.is_json() {
        json::print(&result)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = &app.output;
    if result.warnings.is_empty() {
        ctx.success(&format!(
            "{} ready at {}",
            resolved.installation.name.style(ctx.styles.bold),
            result.path.display()
        ));
    } else {
        ctx.warn(&format!(
            "{} installed at {} with {} warning(s)",
            resolved.installation.name.style(ctx.styles.bold),
            result.path.display(),
            result.warnings.len()
        ));
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the installation pipeline for an already resolved installation.
///
/// # Errors
///
/// See [`ensure_installed`].
pub async fn install_resolved(app: &AppContext, resolved: &Resolved) -> Result<InstallResult> {
    let store = LocalInstallDir::new(&resolved.path);
    let opts = InstallOptions::new(
        &resolved.node,
        &app.settings.installer_url,
        &app.settings.php,
    );
    let reporter = TerminalReporter::with_spinner(&app.output, "Checking Composer installer...");
    let result = ensure_installed(
        &resolved.installation.installer,
        &app.runner(),
        &app.source(),
        &store,
        &SystemClock,
        &reporter,
        &opts,
    )
    .await;
    reporter.finish();

    let result = result?;
    tracing::info!(
        installation = %resolved.installation.name,
        path = %result.path.display(),
        warnings = result.warnings.len(),
        "installation ensured"
    );
    Ok(result)
}
