//! Invocations of the `sdkup` binary that need no network access.

use crate::common::{dir_names, install_sdk};
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// A command isolated from the user's config file and logging settings.
fn sdkup(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sdkup").unwrap();
    cmd.env("SDKUP_CONFIG_PATH", config_dir.join("config.toml"))
        .env("SDKUP_NO_PROGRESS", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_options() {
    let config = TempDir::new().unwrap();
    sdkup(config.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--install"))
        .stdout(predicate::str::contains("--check"));
}

#[test]
fn test_tool_version_flag() {
    let config = TempDir::new().unwrap();
    sdkup(config.path())
        .arg("--tool-version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_up_to_date_offline() {
    let config = TempDir::new().unwrap();
    let install = TempDir::new().unwrap();
    install_sdk(install.path(), "1.9.48");

    sdkup(config.path())
        .arg("--version")
        .arg("1.9.48")
        .arg("--install")
        .arg(install.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    assert_eq!(dir_names(install.path()), vec!["go_appengine"]);
}

#[test]
fn test_version_argument_is_normalized() {
    let config = TempDir::new().unwrap();
    let install = TempDir::new().unwrap();
    install_sdk(install.path(), "1.9.48");

    sdkup(config.path())
        .args(["--version", "go1.9.48", "--quiet", "--install-dir"])
        .arg(install.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1.9.48 is up to date"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_check_reports_upgrade_without_changes() {
    let config = TempDir::new().unwrap();
    let install = TempDir::new().unwrap();
    install_sdk(install.path(), "1.9.48");

    sdkup(config.path())
        .args(["--check", "--version", "1.9.50", "--install"])
        .arg(install.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1.9.48 differs from 1.9.50"));

    assert_eq!(dir_names(install.path()), vec!["go_appengine"]);
}

#[test]
fn test_check_reports_fresh_install() {
    let config = TempDir::new().unwrap();
    let install = TempDir::new().unwrap();

    sdkup(config.path())
        .args(["--check", "--version", "1.9.50", "--install"])
        .arg(install.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No installed version found"));

    assert!(dir_names(install.path()).is_empty());
}

#[test]
fn test_marker_without_release_fails() {
    let config = TempDir::new().unwrap();
    let install = TempDir::new().unwrap();
    std::fs::create_dir_all(install.path().join("go_appengine")).unwrap();
    std::fs::write(install.path().join("go_appengine/VERSION"), "timestamp: 1\n").unwrap();

    sdkup(config.path())
        .args(["--version", "1.9.50", "--install"])
        .arg(install.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No release version found"));

    assert_eq!(dir_names(install.path()), vec!["go_appengine"]);
}

#[test]
fn test_invalid_config_fails() {
    let config = TempDir::new().unwrap();
    std::fs::write(config.path().join("config.toml"), "manifest_url = [").unwrap();

    sdkup(config.path())
        .args(["--check", "--version", "1.9.50"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_config_without_placeholder_fails() {
    let config = TempDir::new().unwrap();
    std::fs::write(
        config.path().join("config.toml"),
        "archive_url_template = \"https://example.com/sdk.zip\"\n",
    )
    .unwrap();

    sdkup(config.path())
        .args(["--check", "--version", "1.9.50"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("{version}"));
}

#[test]
fn test_non_numeric_version_argument_fails() {
    let config = TempDir::new().unwrap();
    sdkup(config.path())
        .args(["--check", "--version", "latest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("contains no version number"));
}
