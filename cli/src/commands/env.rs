//! `composer-provision env` — print the environment a build would see.

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{WorkspaceArgs, process_env, resolve, workspace_bin_dir};
use crate::domain::{EnvVars, with_projected_env};
use crate::output::json;

/// Run the env command.
///
/// Prints only the variables that projection changes, as `NAME=value` lines
/// suitable for `export`.
///
/// # Errors
///
/// Returns an error if the name is unknown or the workspace cannot be determined.
pub fn run(app: &AppContext, args: &WorkspaceArgs) -> Result<ExitCode> {
    let base = process_env();
    let resolved = resolve(app, &args.name, &base)?;
    let home = resolved.path.display().to_string();
    let bin_dir = workspace_bin_dir(&args.workspace_dir()?);
    let merged = with_projected_env(&base, Some(home.as_str()), &bin_dir);
    let changed = changed_vars(&base, &merged);

    if app.is_json() {
        json::print(&changed)?;
    } else {
        for (key, value) in &changed {
            println!("{key}={value}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Entries of `merged` that are new or differ from `base`.
fn changed_vars<'a>(base: &EnvVars, merged: &'a EnvVars) -> BTreeMap<&'a str, &'a str> {
    merged
        .iter()
        .filter(|(k, v)| base.get(*k) != Some(*v))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
