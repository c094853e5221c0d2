//! Integration tests for the CLI skeleton: help, version and error output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

use crate::registry_commands::Sandbox;

fn composer_provision() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("composer-provision"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    composer_provision()
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Provision PHP Composer installations"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", ""] {
        composer_provision()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success();
    }
}

#[test]
fn test_no_color_env_without_subcommand_requires_one() {
    composer_provision()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires a subcommand"));
}

#[test]
fn test_cli_help_lists_commands() {
    composer_provision()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("exec"));
}

#[test]
fn test_version_command_shows_version() {
    composer_provision()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "composer-provision ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = composer_provision()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_installation_fails_with_message() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["install", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Composer installation not found: ghost",
        ));
}

#[test]
fn test_unknown_installation_json_error_object() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["install", "ghost", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "INSTALLATION_NOT_FOUND");
}

#[test]
fn test_malformed_settings_env_is_reported() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("list")
        .env("COMPOSER_PROVISION_COMMAND_TIMEOUT_SECS", "soon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMPOSER_PROVISION_"));
}
