//! Schema of the installations file and runtime settings.
//!
//! Pure types and validators with no I/O.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::composer::{DEFAULT_INSTALLER_URL, DEFAULT_PHP};
use crate::domain::error::ConfigError;
use crate::domain::installation::{ToolInstallation, validate_installation_name};

// ── Installations file ───────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.composer-provision/installations.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Configured installations, in registration order.
    pub installations: Vec<ToolInstallation>,
    /// Home overrides for the local node, keyed by installation name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tool_locations: BTreeMap<String, String>,
}

impl ProvisionConfig {
    /// Check names are valid and unique.
    ///
    /// # Errors
    ///
    /// Returns an error on the first invalid or duplicated name.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for inst in &self.installations {
            validate_installation_name(&inst.name)?;
            if !seen.insert(inst.name.as_str()) {
                return Err(ConfigError::DuplicateName(inst.name.clone()).into());
            }
        }
        Ok(())
    }
}

// ── Runtime settings ─────────────────────────────────────────────────────────

/// Settings read from `COMPOSER_PROVISION_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// URL of the Composer installer script.
    #[serde(default = "default_installer_url")]
    pub installer_url: String,
    /// PHP interpreter used for every Composer command.
    #[serde(default = "default_php")]
    pub php: String,
    /// Per-command timeout applied by the process runner.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Root for default install locations; `~/.composer-provision` when unset.
    #[serde(default)]
    pub tools_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            installer_url: default_installer_url(),
            php: default_php(),
            command_timeout_secs: default_command_timeout_secs(),
            tools_dir: None,
        }
    }
}

fn default_installer_url() -> String {
    DEFAULT_INSTALLER_URL.to_string()
}

fn default_php() -> String {
    DEFAULT_PHP.to_string()
}

fn default_command_timeout_secs() -> u64 {
    600
}
