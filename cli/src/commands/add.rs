//! `composer-provision add` — register or replace an installation.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::installation::DEFAULT_REFRESH_INTERVAL_HOURS;
use crate::domain::{InstallerConfig, ToolInstallation};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Installation name
    pub name: String,

    /// Installation home; may reference `$VAR` or `${VAR}` (default: under the tools dir)
    #[arg(long)]
    pub home: Option<String>,

    /// Whitespace-separated packages to `composer global require`
    #[arg(long, default_value = "")]
    pub deps: String,

    /// Hours between self-update cycles
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL_HOURS)]
    pub refresh_hours: u64,

    /// Installer id
    #[arg(long)]
    pub installer_id: Option<String>,
}

/// Run the add command.
///
/// # Errors
///
/// Returns an error if the name is invalid or the registry cannot be saved.
pub fn run(app: &AppContext, args: AddArgs) -> Result<ExitCode> {
    let installation = ToolInstallation::new(
        &args.name,
        args.home.as_deref(),
        InstallerConfig::new(args.installer_id, &args.deps, args.refresh_hours),
    );

    let mut registry = app.registry()?;
    let replaced = registry.upsert(installation)?;

    if app.is_json() {
        println!(
            "{}",
            serde_json::json!({ "name": args.name, "replaced": replaced })
        );
    } else if replaced {
        app.output.success(&format!("Updated installation {}", args.name));
    } else {
        app.output.success(&format!("Added installation {}", args.name));
    }
    Ok(ExitCode::SUCCESS)
}
