//! Runtime settings from `COMPOSER_PROVISION_*` environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::Settings;
use crate::infra::config::app_dir;

/// Prefix shared by every settings variable.
pub const SETTINGS_ENV_PREFIX: &str = "COMPOSER_PROVISION_";

/// Load settings from the process environment.
///
/// # Errors
///
/// Returns an error if a variable is set but cannot be parsed.
pub fn load_settings() -> Result<Settings> {
    envy::prefixed(SETTINGS_ENV_PREFIX)
        .from_env::<Settings>()
        .context("failed to load settings from COMPOSER_PROVISION_* env vars")
}

/// Root under which default install locations are created.
///
/// # Errors
///
/// Returns an error if no tools dir is configured and the home directory
/// cannot be determined.
pub fn tools_root(settings: &Settings) -> Result<PathBuf> {
    match &settings.tools_dir {
        Some(dir) => Ok(dir.clone()),
        None => app_dir(),
    }
}
