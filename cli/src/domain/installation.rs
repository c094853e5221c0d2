//! Installation value types and pure node/environment resolution.
//!
//! Resolution never mutates an installation: every function here takes a
//! borrowed value and returns a derived copy.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::domain::error::InstallationError;

/// Process environment as seen by resolution and projection.
pub type EnvVars = BTreeMap<String, String>;

/// Default interval between self-update cycles.
pub const DEFAULT_REFRESH_INTERVAL_HOURS: u64 = 72;

/// Directory under a node's tools root that holds default install locations.
pub const TOOLS_SUBDIR: &str = "tools";

/// Tool kind segment of default install locations.
pub const TOOL_KIND: &str = "composer";

pub static INSTALLATION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").expect("valid regex")
});

/// `${VAR}` or `$VAR` references inside a home template.
static VAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex")
});

// ── Installer config ─────────────────────────────────────────────────────────

/// How a Composer installation is installed and kept fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Installer id. `None` or empty means the default installer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whitespace-separated package list passed to `composer global require`.
    #[serde(default)]
    pub global_dependencies: String,
    /// Hours between `self-update` + `global update` cycles.
    #[serde(default = "default_refresh_interval_hours")]
    pub refresh_interval_hours: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            id: None,
            global_dependencies: String::new(),
            refresh_interval_hours: DEFAULT_REFRESH_INTERVAL_HOURS,
        }
    }
}

fn default_refresh_interval_hours() -> u64 {
    DEFAULT_REFRESH_INTERVAL_HOURS
}

impl InstallerConfig {
    #[must_use]
    pub fn new(id: Option<String>, global_dependencies: &str, refresh_interval_hours: u64) -> Self {
        Self {
            id: id.filter(|s| !s.is_empty()),
            global_dependencies: global_dependencies.to_string(),
            refresh_interval_hours,
        }
    }

    /// Package tokens of the global dependency list.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.global_dependencies.split_whitespace()
    }

    /// `true` when there is nothing to `global require`.
    #[must_use]
    pub fn has_dependencies(&self) -> bool {
        self.packages().next().is_some()
    }
}

// ── Tool installation ────────────────────────────────────────────────────────

/// One configured Composer installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInstallation {
    /// Unique key within the registry.
    pub name: String,
    /// Home template; may reference `$VAR` / `${VAR}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    /// Opaque extension bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Installer settings.
    #[serde(default)]
    pub installer: InstallerConfig,
}

impl ToolInstallation {
    #[must_use]
    pub fn new(name: &str, home: Option<&str>, installer: InstallerConfig) -> Self {
        Self {
            name: name.to_string(),
            home: home.filter(|h| !h.is_empty()).map(str::to_string),
            properties: BTreeMap::new(),
            installer,
        }
    }

    fn with_home(&self, home: Option<String>) -> Self {
        Self {
            home,
            ..self.clone()
        }
    }
}

/// Validates an installation name.
///
/// # Errors
///
/// Returns an error if the name is empty or contains path separators.
pub fn validate_installation_name(name: &str) -> Result<()> {
    if !INSTALLATION_NAME_RE.is_match(name) {
        return Err(InstallationError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

// ── Node ─────────────────────────────────────────────────────────────────────

/// Execution context that installations are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Display name, e.g. `local`.
    pub name: String,
    /// Root under which default install locations are created.
    pub tools_root: PathBuf,
    /// Per-installation home overrides, keyed by installation name.
    pub tool_locations: BTreeMap<String, String>,
}

impl Node {
    /// The node this process runs on.
    #[must_use]
    pub fn local(tools_root: PathBuf, tool_locations: BTreeMap<String, String>) -> Self {
        Self {
            name: "local".to_string(),
            tools_root,
            tool_locations,
        }
    }
}

/// Translate an installation's home for `node`.
///
/// A node-specific tool location replaces the configured home; otherwise
/// the home is carried over unchanged.
#[must_use]
pub fn resolve_for_node(installation: &ToolInstallation, node: &Node) -> ToolInstallation {
    let home = node
        .tool_locations
        .get(&installation.name)
        .filter(|loc| !loc.is_empty())
        .cloned()
        .or_else(|| installation.home.clone());
    installation.with_home(home)
}

/// Expand variable references in an installation's home against `env`.
#[must_use]
pub fn resolve_for_env(installation: &ToolInstallation, env: &EnvVars) -> ToolInstallation {
    let home = installation.home.as_deref().map(|h| expand_vars(h, env));
    installation.with_home(home)
}

/// Replace `$VAR` and `${VAR}` with values from `env`.
///
/// Unknown variables are left verbatim.
#[must_use]
pub fn expand_vars(template: &str, env: &EnvVars) -> String {
    VAR_REF_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            env.get(name)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Directory an installation is installed into on `node`.
///
/// Uses the (already resolved) home when set, otherwise
/// `<tools_root>/tools/composer/<sanitized name>`.
#[must_use]
pub fn preferred_location(installation: &ToolInstallation, node: &Node) -> PathBuf {
    match installation.home.as_deref() {
        Some(home) if !home.trim().is_empty() => PathBuf::from(home),
        _ => node
            .tools_root
            .join(TOOLS_SUBDIR)
            .join(TOOL_KIND)
            .join(sanitize_segment(&installation.name)),
    }
}

/// Replace characters that are unsafe in a single path segment.
#[must_use]
pub fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".repeat(cleaned.len().max(1)),
        _ => cleaned,
    }
}
