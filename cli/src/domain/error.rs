//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Installation errors ───────────────────────────────────────────────────────

/// Errors related to looking up and editing configured installations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstallationError {
    #[error("Composer installation not found: {0}")]
    NotFound(String),

    #[error("Invalid installation name '{0}': must match ^[A-Za-z0-9][A-Za-z0-9._-]{{0,63}}$")]
    InvalidName(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while loading the installations file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Duplicate installation name '{0}' in configuration")]
    DuplicateName(String),
}
