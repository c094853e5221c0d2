//! Application service — the registry of configured installations.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::installation::validate_installation_name;
use crate::domain::{InstallationError, ProvisionConfig, ToolInstallation};

/// Ordered list of installations backed by a `ConfigStore`.
///
/// Loaded once and saved explicitly on every mutation.
pub struct InstallationRegistry<'a, S: ConfigStore> {
    store: &'a S,
    config: ProvisionConfig,
}

impl<'a, S: ConfigStore> InstallationRegistry<'a, S> {
    /// Load the registry; empty when nothing was persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(store: &'a S) -> Result<Self> {
        let config = store.load()?;
        config.validate()?;
        Ok(Self { store, config })
    }

    #[must_use]
    pub fn installations(&self) -> &[ToolInstallation] {
        &self.config.installations
    }

    #[must_use]
    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Replace every installation and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the list has invalid or duplicated names, or if
    /// it cannot be saved.
    pub fn set_installations(&mut self, installations: Vec<ToolInstallation>) -> Result<()> {
        let next = ProvisionConfig {
            installations,
            ..self.config.clone()
        };
        next.validate()?;
        self.store.save(&next)?;
        self.config = next;
        Ok(())
    }

    /// Look up an installation by exact name.
    ///
    /// # Errors
    ///
    /// Returns `InstallationError::NotFound` when no installation has that name.
    pub fn find_by_name(&self, name: &str) -> Result<&ToolInstallation> {
        self.config
            .installations
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| InstallationError::NotFound(name.to_string()).into())
    }

    /// Add `installation`, replacing one with the same name in place.
    ///
    /// Returns `true` when an existing entry was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the registry cannot be saved.
    pub fn upsert(&mut self, installation: ToolInstallation) -> Result<bool> {
        validate_installation_name(&installation.name)?;
        let mut installations = self.config.installations.clone();
        let replaced = match installations.iter_mut().find(|i| i.name == installation.name) {
            Some(existing) => {
                *existing = installation;
                true
            }
            None => {
                installations.push(installation);
                false
            }
        };
        self.set_installations(installations)?;
        Ok(replaced)
    }

    /// Remove the installation called `name`.
    ///
    /// # Errors
    ///
    /// Returns `InstallationError::NotFound` when absent, or an error if the
    /// registry cannot be saved.
    pub fn remove(&mut self, name: &str) -> Result<ToolInstallation> {
        let mut installations = self.config.installations.clone();
        let idx = installations
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| InstallationError::NotFound(name.to_string()))?;
        let removed = installations.remove(idx);
        self.set_installations(installations)?;
        Ok(removed)
    }
}
