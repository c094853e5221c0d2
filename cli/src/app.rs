//! Application context — unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern (e.g. `--verbose`) requires only one
//! field change here; no command signature changes.

use std::time::Duration;

use anyhow::Result;

use crate::application::services::registry::InstallationRegistry;
use crate::domain::{Node, ProvisionConfig, Settings};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::http::UreqSource;
use crate::infra::settings::{load_settings, tools_root};
use crate::output::OutputContext;

/// Timeout for the installer download.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags passed from the top-level CLI.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context. Quiet in JSON mode so stdout stays parseable.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Installations file.
    pub config_store: YamlConfigStore,
    /// Settings from `COMPOSER_PROVISION_*` environment variables.
    pub settings: Settings,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings environment variables are malformed.
    pub fn new(flags: &OutputFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let settings = load_settings()?;
        tracing::debug!(
            installer_url = %settings.installer_url,
            php = %settings.php,
            command_timeout_secs = settings.command_timeout_secs,
            "settings loaded"
        );

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config_store: YamlConfigStore,
            settings,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Load the installation registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the installations file cannot be read or is invalid.
    pub fn registry(&self) -> Result<InstallationRegistry<'_, YamlConfigStore>> {
        InstallationRegistry::load(&self.config_store)
    }

    /// The node this process runs on, with tool locations from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tools root cannot be determined.
    pub fn local_node(&self, config: &ProvisionConfig) -> Result<Node> {
        Ok(Node::local(
            tools_root(&self.settings)?,
            config.tool_locations.clone(),
        ))
    }

    #[must_use]
    pub fn runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::new(Duration::from_secs(self.settings.command_timeout_secs))
    }

    #[must_use]
    pub fn source(&self) -> UreqSource {
        UreqSource::new(HTTP_TIMEOUT)
    }
}
