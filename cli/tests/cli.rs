//! End-to-end tests of the goldradar binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Binary sandboxed to `dir`: no user config and no GOLDRADAR overrides leak in
fn goldradar(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("goldradar").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("GOLDRADAR__MAX_RETRIES")
        .env_remove("GOLDRADAR__DEFAULT_ROUTE");
    cmd
}

#[test]
fn test_routes_lists_pages() {
    let dir = TempDir::new().unwrap();

    goldradar(dir.path())
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/scanner"))
        .stdout(predicate::str::contains("Breakout Scanner"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn test_config_applies_file_env_and_flags() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("goldradar.json"),
        r#"{"max_retries": 2, "app_title": "Radar Test"}"#,
    )
    .unwrap();

    goldradar(dir.path())
        .args(["--route", "/alerts", "config"])
        .env("GOLDRADAR__MAX_RETRIES", "7")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_retries\": 7"))
        .stdout(predicate::str::contains("\"app_title\": \"Radar Test\""))
        .stdout(predicate::str::contains("\"default_route\": \"/alerts\""))
        .stderr(predicate::str::contains("goldradar.json"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("goldradar.json"), "{ not json").unwrap();

    goldradar(dir.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_interactive_session_navigates_and_flushes_analytics() {
    let dir = TempDir::new().unwrap();
    let analytics = dir.path().join("analytics.jsonl");

    goldradar(dir.path())
        .arg("--analytics-file")
        .arg(&analytics)
        .write_stdin("go about\nroutes\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gold Breakout Dashboard"))
        .stdout(predicate::str::contains("About GoldRadar"))
        .stdout(predicate::str::contains("cached"));

    let events = std::fs::read_to_string(&analytics).unwrap();
    assert!(events.contains("page_view"));
}
