//! Command implementations

pub mod add;
pub mod env;
pub mod exec;
pub mod install;
pub mod list;
pub mod remove;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::domain::{
    EnvVars, Node, ToolInstallation, preferred_location, resolve_for_env, resolve_for_node,
};

/// Arguments shared by commands that act on one installation in a workspace.
#[derive(Args)]
pub struct WorkspaceArgs {
    /// Installation name
    pub name: String,

    /// Workspace whose `vendor/bin` is put first on PATH (default: current directory)
    #[arg(long, short = 'w')]
    pub workspace: Option<PathBuf>,
}

impl WorkspaceArgs {
    /// Workspace directory, defaulting to the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn workspace_dir(&self) -> Result<PathBuf> {
        match &self.workspace {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("cannot determine current directory"),
        }
    }
}

/// `vendor/bin` inside a workspace.
#[must_use]
pub fn workspace_bin_dir(workspace: &Path) -> PathBuf {
    workspace.join("vendor").join("bin")
}

/// An installation translated for the local node and the process environment.
pub struct Resolved {
    pub installation: ToolInstallation,
    pub node: Node,
    /// Directory the installation lives in.
    pub path: PathBuf,
}

/// Look `name` up and resolve it for this process.
///
/// # Errors
///
/// Returns an error if the name is unknown or the registry cannot be loaded.
pub fn resolve(app: &AppContext, name: &str, env: &EnvVars) -> Result<Resolved> {
    let registry = app.registry()?;
    let configured = registry.find_by_name(name)?;
    let node = app.local_node(registry.config())?;
    let installation = resolve_for_env(&resolve_for_node(configured, &node), env);
    let path = preferred_location(&installation, &node);
    tracing::debug!(
        installation = %installation.name,
        node = %node.name,
        path = %path.display(),
        "installation resolved"
    );
    Ok(Resolved {
        installation,
        node,
        path,
    })
}

/// Snapshot of the process environment.
#[must_use]
pub fn process_env() -> EnvVars {
    std::env::vars().collect()
}
