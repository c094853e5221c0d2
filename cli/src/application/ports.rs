//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{CommandLine, Node, ProvisionConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution on a node so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `command` on `node` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be run at all (spawn
    /// failure, timeout). A non-zero exit is reported through `Output::status`.
    async fn run(&self, node: &Node, command: &CommandLine) -> Result<Output>;
}

// ── Remote Source Port ────────────────────────────────────────────────────────

/// Response to a conditional GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResponse {
    /// Server answered `304 Not Modified`.
    NotModified,
    /// Server answered with a non-success status other than 304.
    Status {
        /// HTTP status code.
        code: u16,
        /// Reason phrase, possibly empty.
        reason: String,
    },
    /// Server returned the resource.
    Content {
        /// `Last-Modified` in epoch millis, when the server sent one.
        last_modified: Option<i64>,
        /// Resource body.
        body: Vec<u8>,
    },
}

/// Abstracts HTTP access to the installer script.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// Request `url`, sending `If-Modified-Since` when `if_modified_since` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when no response could be obtained (DNS, connect,
    /// TLS, timeout or a broken body stream).
    async fn get(&self, url: &str, if_modified_since: Option<i64>) -> Result<SourceResponse>;
}

// ── Install State Port ────────────────────────────────────────────────────────

/// One installation directory: its contents and its marker files.
///
/// Marker readers return `None` for missing or corrupt markers.
pub trait InstallStateStore {
    /// Directory this store manages.
    fn root(&self) -> &Path;
    /// `true` when the directory exists and holds at least one entry.
    fn has_content(&self) -> bool;
    /// Delete every entry in the directory, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or emptied.
    fn reset(&self) -> Result<()>;
    /// Write the fetched installer script and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_installer(&self, body: &[u8]) -> Result<PathBuf>;

    fn fetch_timestamp(&self) -> Option<i64>;
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    fn write_fetch_timestamp(&self, millis: i64) -> Result<()>;

    fn last_dependency_update(&self) -> Option<i64>;
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    fn write_last_dependency_update(&self, millis: i64) -> Result<()>;

    fn dependency_fingerprint(&self) -> Option<String>;
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    fn write_dependency_fingerprint(&self, fingerprint: &str) -> Result<()>;
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Wall-clock source, injectable so refresh decisions are deterministic in tests.
pub trait Clock {
    /// Current time in epoch millis.
    fn now_millis(&self) -> i64;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts persistence of the installations file.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ProvisionConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &ProvisionConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
