//! `composer-provision list` — show configured installations.

use std::process::ExitCode;

use anyhow::Result;
use owo_colors::OwoColorize as _;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::commands::process_env;
use crate::domain::{ToolInstallation, preferred_location, resolve_for_env, resolve_for_node};

#[derive(Serialize)]
struct ListedInstallation<'a> {
    #[serde(flatten)]
    installation: &'a ToolInstallation,
    /// Where the installation lives on this node.
    path: String,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the installations file cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let registry = app.registry()?;
    let node = app.local_node(registry.config())?;
    let env = process_env();

    let listed: Vec<ListedInstallation<'_>> = registry
        .installations()
        .iter()
        .map(|installation| {
            let resolved = resolve_for_env(&resolve_for_node(installation, &node), &env);
            ListedInstallation {
                installation,
                path: preferred_location(&resolved, &node).display().to_string(),
            }
        })
        .collect();

    if app.is_json() {
        crate::output::json::print(&listed)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = &app.output;
    if listed.is_empty() {
        ctx.info(&format!(
            "No installations configured in {}",
            app.config_store.path()?.display()
        ));
        ctx.info("Add one with: composer-provision add <name>");
        return Ok(ExitCode::SUCCESS);
    }

    ctx.header("Composer installations");
    for item in &listed {
        let inst = item.installation;
        println!("  {}", inst.name.style(ctx.styles.bold));
        ctx.kv("  path        ", &item.path);
        if inst.installer.has_dependencies() {
            ctx.kv("  dependencies", &inst.installer.global_dependencies);
        }
        ctx.kv(
            "  refresh     ",
            &format!("every {}h", inst.installer.refresh_interval_hours),
        );
    }
    Ok(ExitCode::SUCCESS)
}
