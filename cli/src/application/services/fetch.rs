//! Application service — conditional download of the installer script.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{InstallStateStore, RemoteSource, SourceResponse};

/// Why a fetch left the install directory alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Source unreachable; previously installed content is reused.
    Offline { error: String },
    /// Server answered `304 Not Modified`.
    NotModified,
    /// Server answered with an error status.
    ServerError { code: u16, reason: String },
    /// Server answered with a success status but no body.
    EmptyBody,
    /// Source timestamp equals the stored one.
    UpToDate,
}

/// Result of `fetch_if_stale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Nothing was written.
    Skipped(SkipReason),
    /// Directory was replaced with a fresh download.
    Installed {
        /// Source last-modified millis recorded in the fetch marker.
        timestamp: i64,
    },
}

/// Download `url` into `store` unless the stored copy is current.
///
/// `prior_timestamp` is the last recorded source timestamp; zero or `None`
/// means "never fetched" and disables `If-Modified-Since`. The directory is
/// cleared only once a fresh body is in hand and its timestamp differs from
/// the prior one.
///
/// # Errors
///
/// Returns an error when the source is unreachable and there is no earlier
/// content to fall back to, or when the directory cannot be rewritten.
pub async fn fetch_if_stale(
    source: &impl RemoteSource,
    store: &impl InstallStateStore,
    url: &str,
    prior_timestamp: Option<i64>,
) -> Result<FetchOutcome> {
    let prior = prior_timestamp.filter(|t| *t != 0);
    let dir = store.root().display().to_string();

    let response = match source.get(url, prior).await {
        Ok(response) => response,
        Err(e) if store.has_content() => {
            let error = format!("{e:#}");
            tracing::debug!(url, dir = %dir, %error, "source unreachable, keeping existing installation");
            return Ok(FetchOutcome::Skipped(SkipReason::Offline { error }));
        }
        Err(e) => return Err(e.context(format!("failed to install {url} to {dir}"))),
    };

    match response {
        SourceResponse::NotModified => {
            tracing::debug!(url, dir = %dir, "source not modified");
            Ok(FetchOutcome::Skipped(SkipReason::NotModified))
        }
        SourceResponse::Status { code, reason } => {
            tracing::debug!(
                url,
                dir = %dir,
                status = code,
                %reason,
                "server error, skipping installation"
            );
            Ok(FetchOutcome::Skipped(SkipReason::ServerError { code, reason }))
        }
        SourceResponse::Content {
            last_modified,
            body,
        } => {
            if body.is_empty() {
                tracing::debug!(url, dir = %dir, "empty response body, skipping installation");
                return Ok(FetchOutcome::Skipped(SkipReason::EmptyBody));
            }
            let source_timestamp = last_modified.unwrap_or(0);
            if prior == Some(source_timestamp) && store.has_content() {
                tracing::debug!(url, dir = %dir, source_timestamp, "installer is up to date");
                return Ok(FetchOutcome::Skipped(SkipReason::UpToDate));
            }

            store.reset()?;
            let path = store.write_installer(&body)?;
            store.write_fetch_timestamp(source_timestamp)?;
            tracing::info!(
                url,
                installer = %path.display(),
                bytes = body.len(),
                source_timestamp,
                "installer downloaded"
            );
            Ok(FetchOutcome::Installed {
                timestamp: source_timestamp,
            })
        }
    }
}
