//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod composer;
pub mod config;
pub mod env;
pub mod error;
pub mod install_state;
pub mod installation;

pub use composer::{CommandLine, Composer};
pub use config::{ProvisionConfig, Settings};
pub use env::{EnvOverrides, project_env, with_projected_env};
pub use error::{ConfigError, InstallationError};
pub use install_state::{REFRESH_POLICY, RefreshPolicy};
pub use installation::{
    EnvVars, InstallerConfig, Node, ToolInstallation, preferred_location, resolve_for_env,
    resolve_for_node,
};

/// Encode bytes as lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
