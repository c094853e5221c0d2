//! Filesystem infrastructure — implements `InstallStateStore` for one directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::InstallStateStore;
use crate::domain::install_state::{
    DEPENDENCY_FINGERPRINT_MARKER, FETCH_TIMESTAMP_MARKER, INSTALLER_FILE, LAST_UPDATE_MARKER,
    format_millis, parse_millis,
};

/// An installation directory on the local filesystem.
pub struct LocalInstallDir {
    root: PathBuf,
}

impl LocalInstallDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_marker(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "unreadable marker");
                None
            }
        }
    }

    fn write_marker(&self, name: &str, content: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating directory {}", self.root.display()))?;
        let path = self.root.join(name);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }
}

impl InstallStateStore for LocalInstallDir {
    fn root(&self) -> &Path {
        &self.root
    }

    fn has_content(&self) -> bool {
        std::fs::read_dir(&self.root).is_ok_and(|mut entries| entries.next().is_some())
    }

    fn reset(&self) -> Result<()> {
        if !self.root.exists() {
            return std::fs::create_dir_all(&self.root)
                .with_context(|| format!("creating directory {}", self.root.display()));
        }
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("reading directory {}", self.root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("reading directory {}", self.root.display()))?;
            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("removing directory {}", path.display()))?;
            } else {
                std::fs::remove_file(&path)
                    .with_context(|| format!("removing file {}", path.display()))?;
            }
        }
        Ok(())
    }

    fn write_installer(&self, body: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating directory {}", self.root.display()))?;
        let path = self.root.join(INSTALLER_FILE);
        std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    fn fetch_timestamp(&self) -> Option<i64> {
        self.read_marker(FETCH_TIMESTAMP_MARKER)
            .as_deref()
            .and_then(parse_millis)
    }

    fn write_fetch_timestamp(&self, millis: i64) -> Result<()> {
        self.write_marker(FETCH_TIMESTAMP_MARKER, &format_millis(millis))
    }

    fn last_dependency_update(&self) -> Option<i64> {
        self.read_marker(LAST_UPDATE_MARKER)
            .as_deref()
            .and_then(parse_millis)
    }

    fn write_last_dependency_update(&self, millis: i64) -> Result<()> {
        self.write_marker(LAST_UPDATE_MARKER, &format_millis(millis))
    }

    fn dependency_fingerprint(&self) -> Option<String> {
        self.read_marker(DEPENDENCY_FINGERPRINT_MARKER)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn write_dependency_fingerprint(&self, fingerprint: &str) -> Result<()> {
        self.write_marker(DEPENDENCY_FINGERPRINT_MARKER, fingerprint)
    }
}
