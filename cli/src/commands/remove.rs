//! `composer-provision remove` — unregister an installation.
//!
//! Files on disk are left in place.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Installation name
    pub name: String,
}

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if no installation has that name or the registry cannot
/// be saved.
pub fn run(app: &AppContext, args: &RemoveArgs) -> Result<ExitCode> {
    let mut registry = app.registry()?;
    let removed = registry.remove(&args.name)?;

    if app.is_json() {
        println!("{}", serde_json::json!({ "removed": removed.name }));
    } else {
        app.output
            .success(&format!("Removed installation {}", removed.name));
    }
    Ok(ExitCode::SUCCESS)
}
