//! End-to-end CLI tests using `assert_cmd`.
//!
//! These tests invoke the actual compiled binary and verify exit codes
//! and output. None of them need a running graph service.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("socialgraph").unwrap();
    cmd.env_remove("SOCIALGRAPH_CONFIG")
        .env_remove("SOCIALGRAPH_API_URL");
    cmd
}

/// An address nothing listens on.
fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("neighbors"))
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("communities"))
        .stdout(predicate::str::contains("explore"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_version_shows_semver() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("socialgraph"));
}

#[test]
fn test_explore_help_lists_session_commands() {
    cmd()
        .args(["explore", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tap node"))
        .stdout(predicate::str::contains("click"));
}

// ─── Argument validation ────────────────────────────────────────────────

#[test]
fn test_recommend_requires_user() {
    cmd()
        .arg("recommend")
        .assert()
        .failure()
        .stderr(predicate::str::contains("USER"));
}

#[test]
fn test_recommend_rejects_non_numeric_user() {
    cmd()
        .args(["recommend", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_path_requires_two_users() {
    cmd()
        .args(["path", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("END"));
}

// ─── Init ───────────────────────────────────────────────────────────────

#[test]
fn test_init_writes_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("nested").join("config.toml");

    cmd()
        .arg("--config")
        .arg(&config_path)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[api]"));
    assert!(content.contains("base_url"));
    assert!(content.contains("[explorer]"));
    assert!(content.contains("[layout]"));
}

#[test]
fn test_init_keeps_existing_config_without_force() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[api]\nbase_url = \"http://example.test/api\"\n").unwrap();

    cmd()
        .arg("--config")
        .arg(&config_path)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert!(fs::read_to_string(&config_path).unwrap().contains("example.test"));

    cmd()
        .arg("--config")
        .arg(&config_path)
        .args(["init", "--force"])
        .assert()
        .success();
    assert!(!fs::read_to_string(&config_path).unwrap().contains("example.test"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[api\nbase_url = ").unwrap();

    cmd()
        .arg("--config")
        .arg(&config_path)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

// ─── Service errors ─────────────────────────────────────────────────────

#[test]
fn test_unreachable_service_fails() {
    let dir = tempdir().unwrap();
    cmd()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .args(["--api-url", &closed_url(), "neighbors", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}

#[test]
fn test_api_url_from_environment() {
    let dir = tempdir().unwrap();
    cmd()
        .env("SOCIALGRAPH_CONFIG", dir.path().join("missing.toml"))
        .env("SOCIALGRAPH_API_URL", closed_url())
        .arg("communities")
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}
