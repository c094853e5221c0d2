//! Install-state markers and the pure decisions made from them.
//!
//! Marker files are plain UTF-8 text, one scalar per file. Reading and
//! writing them is infra's job; this module only names them, parses their
//! content and decides what is due.

use sha2::{Digest, Sha256};

use crate::domain::hex_encode;

/// Conditional-GET marker: source last-modified time in epoch millis.
pub const FETCH_TIMESTAMP_MARKER: &str = ".timestamp";

/// Wall-clock millis of the last successful self-update + global update.
pub const LAST_UPDATE_MARKER: &str = ".composerLastUpdate";

/// Fingerprint of the last successfully required dependency list.
pub const DEPENDENCY_FINGERPRINT_MARKER: &str = ".composerGlobalDependencies";

/// Well-known name of the fetched installer script.
pub const INSTALLER_FILE: &str = "installer";

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// When the self-update cycle runs relative to the last-update marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Run when no marker exists or the interval has elapsed since it.
    WhenStale,
    /// Run only while a marker exists and is younger than the interval.
    ///
    /// Legacy polarity, kept for setups that depend on it.
    WithinWindow,
}

/// Polarity used by the installation orchestrator.
pub const REFRESH_POLICY: RefreshPolicy = RefreshPolicy::WhenStale;

impl RefreshPolicy {
    /// Decide whether a self-update cycle is due at `now_ms`.
    #[must_use]
    pub fn is_due(self, last_update_ms: Option<i64>, interval_hours: u64, now_ms: i64) -> bool {
        let interval_ms = i64::try_from(interval_hours)
            .ok()
            .and_then(|h| h.checked_mul(MILLIS_PER_HOUR))
            .unwrap_or(i64::MAX);
        match (self, last_update_ms) {
            (RefreshPolicy::WhenStale, None) => true,
            (RefreshPolicy::WhenStale, Some(last)) => last.saturating_add(interval_ms) <= now_ms,
            (RefreshPolicy::WithinWindow, None) => false,
            (RefreshPolicy::WithinWindow, Some(last)) => last.saturating_add(interval_ms) > now_ms,
        }
    }
}

/// Parse a millisecond marker. Corrupt content reads as "never written".
#[must_use]
pub fn parse_millis(content: &str) -> Option<i64> {
    content.trim().parse::<i64>().ok()
}

/// Render a millisecond marker.
#[must_use]
pub fn format_millis(ms: i64) -> String {
    ms.to_string()
}

/// Deterministic fingerprint of a dependency list, used for change detection.
#[must_use]
pub fn dependency_fingerprint(dependencies: &str) -> String {
    hex_encode(&Sha256::digest(dependencies.as_bytes()))
}

/// `true` when `stored` matches the fingerprint of `dependencies`.
#[must_use]
pub fn fingerprint_matches(stored: Option<&str>, dependencies: &str) -> bool {
    stored.is_some_and(|s| s.trim() == dependency_fingerprint(dependencies))
}
