//! `composer-provision exec` — run a build command with a Composer installation on PATH.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::commands::install::install_resolved;
use crate::commands::{WorkspaceArgs, process_env, resolve, workspace_bin_dir};
use crate::domain::with_projected_env;

/// Arguments for the exec command.
#[derive(Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub target: WorkspaceArgs,

    /// Command and arguments to run in the workspace (after `--`)
    #[arg(required = true, allow_hyphen_values = true, last = true)]
    pub command: Vec<String>,
}

/// Ensure the installation, then run the command in the workspace.
///
/// Passes stdin, stdout, and stderr through and returns the command's exit code.
///
/// # Errors
///
/// Returns an error if the installation cannot be set up or the command
/// cannot be spawned.
pub async fn run(app: &AppContext, args: &ExecArgs) -> Result<ExitCode> {
    let base = process_env();
    let resolved = resolve(app, &args.target.name, &base)?;
    let result = install_resolved(app, &resolved).await?;

    let workspace = args.target.workspace_dir()?;
    let home = result.path.display().to_string();
    let env = with_projected_env(&base, Some(home.as_str()), &workspace_bin_dir(&workspace));

    let Some((program, rest)) = args.command.split_first() else {
        anyhow::bail!("no command given");
    };
    tracing::debug!(%program, workspace = %workspace.display(), "launching build command");
    let status = tokio::process::Command::new(program)
        .args(rest)
        .env_clear()
        .envs(&env)
        .current_dir(&workspace)
        .status()
        .await
        .with_context(|| format!("failed to spawn {program}"))?;

    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
