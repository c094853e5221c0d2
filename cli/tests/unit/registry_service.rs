//! Tests for the `registry` application service over an in-memory `ConfigStore`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use composer_provision::application::ports::ConfigStore;
use composer_provision::application::services::registry::InstallationRegistry;
use composer_provision::domain::{
    InstallationError, InstallerConfig, ProvisionConfig, ToolInstallation,
};

// ── Mock: in-memory config store ──────────────────────────────────────────────

#[derive(Default)]
struct MemoryConfigStore {
    config: Mutex<ProvisionConfig>,
    saves: Mutex<u32>,
}

impl MemoryConfigStore {
    fn with(installations: Vec<ToolInstallation>) -> Self {
        Self {
            config: Mutex::new(ProvisionConfig {
                installations,
                ..ProvisionConfig::default()
            }),
            saves: Mutex::new(0),
        }
    }

    fn save_count(&self) -> u32 {
        *self.saves.lock().expect("lock")
    }

    fn names(&self) -> Vec<String> {
        self.config
            .lock()
            .expect("lock")
            .installations
            .iter()
            .map(|i| i.name.clone())
            .collect()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        Ok(self.config.lock().expect("lock").clone())
    }

    fn save(&self, config: &ProvisionConfig) -> Result<()> {
        *self.config.lock().expect("lock") = config.clone();
        *self.saves.lock().expect("lock") += 1;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/memory/installations.yaml"))
    }
}

fn inst(name: &str, deps: &str) -> ToolInstallation {
    ToolInstallation::new(name, None, InstallerConfig::new(None, deps, 72))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_load_empty_store_has_no_installations() {
    let store = MemoryConfigStore::default();
    let registry = InstallationRegistry::load(&store).expect("load");
    assert!(registry.installations().is_empty());
}

#[test]
fn test_load_rejects_duplicate_names() {
    let store = MemoryConfigStore::with(vec![inst("dup", ""), inst("dup", "x/y")]);
    assert!(InstallationRegistry::load(&store).is_err());
}

#[test]
fn test_find_by_name_returns_matching_installation() {
    let store = MemoryConfigStore::with(vec![inst("a", ""), inst("b", "vendor/pkg")]);
    let registry = InstallationRegistry::load(&store).expect("load");
    let found = registry.find_by_name("b").expect("found");
    assert_eq!(found.installer.global_dependencies, "vendor/pkg");
}

#[test]
fn test_find_by_name_unknown_is_not_found_error() {
    let store = MemoryConfigStore::with(vec![inst("a", "")]);
    let registry = InstallationRegistry::load(&store).expect("load");
    let err = registry.find_by_name("ghost").unwrap_err();
    assert_eq!(
        err.downcast_ref::<InstallationError>(),
        Some(&InstallationError::NotFound("ghost".to_string()))
    );
    assert_eq!(err.to_string(), "Composer installation not found: ghost");
}

#[test]
fn test_set_installations_replaces_and_saves() {
    let store = MemoryConfigStore::with(vec![inst("a", "")]);
    let mut registry = InstallationRegistry::load(&store).expect("load");
    registry
        .set_installations(vec![inst("b", ""), inst("c", "")])
        .expect("set");
    assert_eq!(store.names(), vec!["b", "c"]);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_set_installations_with_duplicates_saves_nothing() {
    let store = MemoryConfigStore::with(vec![inst("a", "")]);
    let mut registry = InstallationRegistry::load(&store).expect("load");
    assert!(
        registry
            .set_installations(vec![inst("b", ""), inst("b", "")])
            .is_err()
    );
    assert_eq!(store.save_count(), 0);
    assert_eq!(registry.installations().len(), 1);
}

#[test]
fn test_upsert_appends_new_and_replaces_existing_in_place() {
    let store = MemoryConfigStore::with(vec![inst("a", ""), inst("b", "")]);
    let mut registry = InstallationRegistry::load(&store).expect("load");

    assert!(!registry.upsert(inst("c", "")).expect("add"));
    assert!(registry.upsert(inst("a", "vendor/new")).expect("replace"));

    assert_eq!(store.names(), vec!["a", "b", "c"]);
    assert_eq!(
        registry.find_by_name("a").expect("a").installer.global_dependencies,
        "vendor/new"
    );
}

#[test]
fn test_upsert_rejects_invalid_name() {
    let store = MemoryConfigStore::default();
    let mut registry = InstallationRegistry::load(&store).expect("load");
    assert!(registry.upsert(inst("../escape", "")).is_err());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_remove_existing_and_unknown() {
    let store = MemoryConfigStore::with(vec![inst("a", ""), inst("b", "")]);
    let mut registry = InstallationRegistry::load(&store).expect("load");

    let removed = registry.remove("a").expect("remove");
    assert_eq!(removed.name, "a");
    assert_eq!(store.names(), vec!["b"]);

    let err = registry.remove("a").unwrap_err();
    assert!(err.downcast_ref::<InstallationError>().is_some());
}
