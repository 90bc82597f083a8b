//! End-to-end checks of the `beacon` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn beacon(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("beacon").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    beacon(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn verbose_and_quiet_conflict() {
    let dir = TempDir::new().unwrap();
    beacon(&dir)
        .args(["build", "--verbose", "--quiet"])
        .assert()
        .failure();
}

#[test]
#[serial]
fn build_without_sources_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), "{}").unwrap();

    beacon(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("index.tsx"));

    assert!(!dir.path().join("dist/index.html").exists());
}

#[test]
#[serial]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), "{}").unwrap();
    std::fs::write(
        dir.path().join("beacon.config.json"),
        r#"{ "outputDirectory": "build" }"#,
    )
    .unwrap();

    beacon(&dir)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("outputDirectory"));
}

#[test]
#[serial]
fn dev_rejects_non_loopback_host() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), "{}").unwrap();

    beacon(&dir)
        .arg("dev")
        .env("BEACON_DEV__HOST", "0.0.0.0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("host"));
}
