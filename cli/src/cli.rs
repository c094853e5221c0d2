//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Provision PHP Composer installations with cached installs and global dependencies
#[derive(Parser)]
#[command(
    name = "composer-provision",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install or refresh a Composer installation
    Install(commands::install::InstallArgs),

    /// Print the environment a build would run with
    Env(commands::WorkspaceArgs),

    /// Run a build command with the installation on PATH
    Exec(commands::exec::ExecArgs),

    /// List configured installations
    List,

    /// Add or replace an installation
    Add(commands::add::AddArgs),

    /// Remove an installation
    Remove(commands::remove::RemoveArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let flags = OutputFlags {
            no_color,
            quiet,
            json,
        };
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
            Command::Install(args) => commands::install::run(&AppContext::new(&flags)?, &args).await,
            Command::Env(args) => commands::env::run(&AppContext::new(&flags)?, &args),
            Command::Exec(args) => commands::exec::run(&AppContext::new(&flags)?, &args).await,
            Command::List => commands::list::run(&AppContext::new(&flags)?),
            Command::Add(args) => commands::add::run(&AppContext::new(&flags)?, args),
            Command::Remove(args) => commands::remove::run(&AppContext::new(&flags)?, &args),
        }
    }
}
