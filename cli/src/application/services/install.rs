//! Application service — the Composer installation state machine.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! One invocation runs strictly in order: fetch installer → run installer →
//! refresh global dependencies → self-update cycle. Failing Composer commands
//! are downgraded to warnings and the markers for that step stay untouched,
//! so the step is retried on the next invocation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{
    Clock, CommandRunner, InstallStateStore, ProgressReporter, RemoteSource,
};
use crate::application::services::fetch::{FetchOutcome, SkipReason, fetch_if_stale};
use crate::domain::install_state::{dependency_fingerprint, fingerprint_matches};
use crate::domain::{CommandLine, Composer, InstallerConfig, Node, REFRESH_POLICY, RefreshPolicy};

/// How far one step of the pipeline got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Nothing to do.
    Skipped,
    /// Ran and succeeded; state was recorded.
    Succeeded,
    /// Ran and failed; state left unchanged.
    Failed,
}

impl StepOutcome {
    /// A skipped step counts as success.
    #[must_use]
    pub fn is_success(self) -> bool {
        !matches!(self, StepOutcome::Failed)
    }
}

/// Everything `ensure_installed` did.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    /// Resolved installation directory.
    pub path: PathBuf,
    pub fetch: FetchOutcome,
    pub installer: StepOutcome,
    pub dependencies: StepOutcome,
    pub self_update: StepOutcome,
    /// Human-readable warnings collected along the way.
    pub warnings: Vec<String>,
}

/// Per-invocation inputs that are not ports.
pub struct InstallOptions<'a> {
    /// Node the Composer commands run on.
    pub node: &'a Node,
    /// URL of the installer script.
    pub installer_url: &'a str,
    /// PHP interpreter.
    pub php: &'a str,
    /// Self-update polarity.
    pub policy: RefreshPolicy,
}

impl<'a> InstallOptions<'a> {
    #[must_use]
    pub fn new(node: &'a Node, installer_url: &'a str, php: &'a str) -> Self {
        Self {
            node,
            installer_url,
            php,
            policy: REFRESH_POLICY,
        }
    }
}

/// Runs commands and collects warnings for one invocation.
struct Steps<'a, R, P> {
    runner: &'a R,
    reporter: &'a P,
    node: &'a Node,
    warnings: Vec<String>,
}

impl<'a, R: CommandRunner, P: ProgressReporter> Steps<'a, R, P> {
    fn new(runner: &'a R, reporter: &'a P, node: &'a Node) -> Self {
        Self {
            runner,
            reporter,
            node,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        self.reporter.warn(&message);
        self.warnings.push(message);
    }

    /// Run `command`; `true` on exit code 0.
    async fn run(&mut self, command: &CommandLine, failure: &str) -> bool {
        tracing::debug!(node = %self.node.name, command = %command, "running");
        match self.runner.run(self.node, command).await {
            Ok(output) if output.status.success() => {
                tracing::debug!(
                    command = %command,
                    stdout = %String::from_utf8_lossy(&output.stdout).trim(),
                    "command succeeded"
                );
                true
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let exit = output
                    .status
                    .code()
                    .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
                tracing::debug!(command = %command, %exit, stderr = %stderr.trim(), "command failed");
                let detail = stderr.lines().next_back().unwrap_or("").trim();
                if detail.is_empty() {
                    self.warn(format!("{failure} ({exit})"));
                } else {
                    self.warn(format!("{failure} ({exit}): {detail}"));
                }
                false
            }
            Err(e) => {
                tracing::debug!(command = %command, error = %format!("{e:#}"), "command could not run");
                self.warn(format!("{failure}: {e:#}"));
                false
            }
        }
    }
}

/// Make sure Composer is installed and fresh in `store`'s directory.
///
/// Never fails because a Composer command failed; those become warnings in
/// the returned `InstallResult`.
///
/// # Errors
///
/// Returns an error when the installer cannot be fetched and nothing was
/// installed before, or when the install directory or a marker file cannot
/// be written.
pub async fn ensure_installed(
    config: &InstallerConfig,
    runner: &impl CommandRunner,
    source: &impl RemoteSource,
    store: &impl InstallStateStore,
    clock: &impl Clock,
    reporter: &impl ProgressReporter,
    opts: &InstallOptions<'_>,
) -> Result<InstallResult> {
    let dir = store.root().to_path_buf();
    let composer = Composer::new(opts.php, &dir);
    let mut steps = Steps::new(runner, reporter, opts.node);

    reporter.step("Checking Composer installer...");
    let fetch = fetch_if_stale(source, store, opts.installer_url, store.fetch_timestamp()).await?;
    let installer = match &fetch {
        FetchOutcome::Installed { .. } => {
            reporter.step("Installing Composer...");
            if steps
                .run(&composer.run_installer(), "Composer installation failed")
                .await
            {
                reporter.success("Composer installed");
                StepOutcome::Succeeded
            } else {
                StepOutcome::Failed
            }
        }
        FetchOutcome::Skipped(reason) => {
            match reason {
                SkipReason::Offline { error } => steps.warn(format!(
                    "Skipping installation of {} to {}: {error}",
                    opts.installer_url,
                    dir.display()
                )),
                SkipReason::ServerError { code, reason } => steps.warn(format!(
                    "Skipping installation of {} to {} due to server error: {code} {reason}",
                    opts.installer_url,
                    dir.display()
                )),
                SkipReason::EmptyBody => steps.warn(format!(
                    "Skipping installation of {} to {}: empty response body",
                    opts.installer_url,
                    dir.display()
                )),
                SkipReason::NotModified | SkipReason::UpToDate => {
                    reporter.step("Installation skipped, installer is up to date");
                }
            }
            StepOutcome::Skipped
        }
    };

    let dependencies = refresh_with(config, store, &composer, &mut steps).await?;

    let self_update = self_update_cycle(config, store, clock, &composer, &mut steps, opts).await?;

    Ok(InstallResult {
        path: dir,
        fetch,
        installer,
        dependencies,
        self_update,
        warnings: steps.warnings,
    })
}

/// Require the configured global dependencies unless they are already installed.
///
/// # Errors
///
/// Returns an error only if the fingerprint marker cannot be written.
pub async fn refresh_dependencies(
    config: &InstallerConfig,
    runner: &impl CommandRunner,
    store: &impl InstallStateStore,
    reporter: &impl ProgressReporter,
    opts: &InstallOptions<'_>,
) -> Result<StepOutcome> {
    let dir = store.root().to_path_buf();
    let composer = Composer::new(opts.php, &dir);
    let mut steps = Steps::new(runner, reporter, opts.node);
    refresh_with(config, store, &composer, &mut steps).await
}

async fn refresh_with<R: CommandRunner, P: ProgressReporter>(
    config: &InstallerConfig,
    store: &impl InstallStateStore,
    composer: &Composer<'_>,
    steps: &mut Steps<'_, R, P>,
) -> Result<StepOutcome> {
    let deps = config.global_dependencies.as_str();
    if !config.has_dependencies()
        || fingerprint_matches(store.dependency_fingerprint().as_deref(), deps)
    {
        tracing::debug!(dependencies = deps, "global dependencies up to date");
        steps.reporter.step("Skipping dependencies installation...");
        return Ok(StepOutcome::Skipped);
    }

    steps.reporter.step("Installing global dependencies...");
    let require = composer.global_require(config.packages());
    if !steps
        .run(&require, "Problem installing Composer global dependencies")
        .await
    {
        return Ok(StepOutcome::Failed);
    }

    store.write_dependency_fingerprint(&dependency_fingerprint(deps))?;
    steps.reporter.success("Global dependencies installed");
    Ok(StepOutcome::Succeeded)
}

async fn self_update_cycle<R: CommandRunner, P: ProgressReporter>(
    config: &InstallerConfig,
    store: &impl InstallStateStore,
    clock: &impl Clock,
    composer: &Composer<'_>,
    steps: &mut Steps<'_, R, P>,
    opts: &InstallOptions<'_>,
) -> Result<StepOutcome> {
    let last_update = store.last_dependency_update();
    if !opts
        .policy
        .is_due(last_update, config.refresh_interval_hours, clock.now_millis())
    {
        tracing::debug!(?last_update, "self-update not due");
        return Ok(StepOutcome::Skipped);
    }

    steps.reporter.step("Updating Composer and global dependencies...");
    let updated = steps
        .run(&composer.self_update(), "Composer self-update failed")
        .await
        && steps
            .run(&composer.global_update(), "Composer global update failed")
            .await;
    if !updated {
        return Ok(StepOutcome::Failed);
    }

    store.write_last_dependency_update(clock.now_millis())?;
    steps.reporter.success("Composer and global dependencies updated");
    Ok(StepOutcome::Succeeded)
}
