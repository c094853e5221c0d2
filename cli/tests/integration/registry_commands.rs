//! Integration tests for `add`, `list` and `remove`.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

/// Isolated config file and tools dir for one test.
pub struct Sandbox {
    pub tmp: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.tmp.path().join("installations.yaml")
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.tmp.path().join("tools-root")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("composer-provision"));
        cmd.env("NO_COLOR", "1")
            .env("COMPOSER_PROVISION_CONFIG", self.config_path())
            .env("COMPOSER_PROVISION_TOOLS_DIR", self.tools_dir())
            .env_remove("COMPOSER_PROVISION_INSTALLER_URL")
            .env_remove("COMPOSER_PROVISION_PHP")
            .env_remove("COMPOSER_PROVISION_COMMAND_TIMEOUT_SECS")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_list_without_config_says_nothing_configured() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No installations configured"));
}

#[test]
fn test_add_then_list_json_shows_installation() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args([
            "add",
            "composer-2",
            "--deps",
            "vendor/pkg-a vendor/pkg-b",
            "--refresh-hours",
            "24",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added installation composer-2"));

    let output = sandbox
        .cmd()
        .args(["list", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let first = &json[0];
    assert_eq!(first["name"], "composer-2");
    assert_eq!(
        first["installer"]["global_dependencies"],
        "vendor/pkg-a vendor/pkg-b"
    );
    assert_eq!(first["installer"]["refresh_interval_hours"], 24);
    let expected = sandbox.tools_dir().join("tools/composer/composer-2");
    assert_eq!(first["path"], expected.display().to_string());
}

#[test]
fn test_add_existing_name_replaces_it() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["add", "c"]).assert().success();
    sandbox
        .cmd()
        .args(["add", "c", "--deps", "vendor/x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated installation c"));

    let yaml = std::fs::read_to_string(sandbox.config_path()).expect("config written");
    assert_eq!(yaml.matches("name: c").count(), 1, "yaml: {yaml}");
    assert!(yaml.contains("vendor/x"));
}

#[test]
fn test_add_rejects_invalid_name() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "../etc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid installation name"));
}

#[test]
fn test_remove_unknown_installation_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["remove", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Composer installation not found: ghost"));
}

#[test]
fn test_remove_existing_installation() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["add", "c"]).assert().success();
    sandbox
        .cmd()
        .args(["remove", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed installation c"));
    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No installations configured"));
}
