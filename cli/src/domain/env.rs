//! Environment projection for processes that use a Composer installation.
//!
//! Overrides follow the `NAME+SUFFIX` convention: a key containing `+`
//! prepends its value to the variable before the `+` (e.g. `PATH+COMPOSER_HOME`
//! prepends to `PATH`); any other key replaces the variable outright.

use std::path::Path;

use serde::Serialize;

use crate::domain::installation::EnvVars;

pub const PATH_VAR: &str = "PATH";
pub const COMPOSER_HOME_VAR: &str = "COMPOSER_HOME";

/// Separator used when prepending to path-like variables.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Ordered name → value overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvOverrides(Vec<(String, String)>);

impl EnvOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override. A later entry for the same key replaces the earlier one.
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.retain(|(k, _)| k != key);
        self.0.push((key.to_string(), value.to_string()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply every override to `env`, left to right.
    pub fn apply_to(&self, env: &mut EnvVars) {
        for (key, value) in &self.0 {
            apply_one(env, key, value);
        }
    }
}

fn apply_one(env: &mut EnvVars, key: &str, value: &str) {
    match key.split_once('+') {
        Some((var, _)) if !var.is_empty() => {
            let merged = match env.get(var) {
                Some(existing) if !existing.is_empty() => {
                    format!("{value}{PATH_SEPARATOR}{existing}")
                }
                _ => value.to_string(),
            };
            env.insert(var.to_string(), merged);
        }
        _ => {
            env.insert(key.to_string(), value.to_string());
        }
    }
}

/// Overrides an installation rooted at `home` contributes.
///
/// Returns an empty set when `home` is unset.
#[must_use]
pub fn project_env(home: Option<&str>) -> EnvOverrides {
    let mut overrides = EnvOverrides::new();
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return overrides;
    };
    overrides.set("PATH+COMPOSER_HOME", home);
    overrides.set("PATH+COMPOSER_GLOBAL_BIN", &format!("{home}/vendor/bin"));
    overrides.set(COMPOSER_HOME_VAR, home);
    overrides
}

/// Merge an installation's overrides and the workspace `vendor/bin` into `base`.
///
/// The workspace bin directory is prepended last so it wins PATH lookup over
/// the installation's global bin directory.
#[must_use]
pub fn with_projected_env(
    base: &EnvVars,
    installation_home: Option<&str>,
    workspace_bin_dir: &Path,
) -> EnvVars {
    let mut env = base.clone();
    project_env(installation_home).apply_to(&mut env);
    apply_one(&mut env, "PATH+PATH", &workspace_bin_dir.display().to_string());
    env
}
