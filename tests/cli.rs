//! Integration tests for CLI commands

#![allow(deprecated)]

mod common;

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use axum::http::StatusCode;
use common::{history_record, MockService};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated from the user's config and environment
fn agriscan(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agriscan").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("AGRISCAN_BACKEND_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_main_command_help() {
    let tmp = TempDir::new().unwrap();
    agriscan(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plant disease"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn test_scan_command_help() {
    let tmp = TempDir::new().unwrap();
    agriscan(&tmp)
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submit a leaf photo"));
}

#[test]
fn test_scan_rejects_unsupported_type_before_network() {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("notes.txt");
    std::fs::write(&notes, "not an image").unwrap();

    // Nothing listens on the address; validation must fail first
    agriscan(&tmp)
        .args(["--api-url", "http://127.0.0.1:1", "scan"])
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn test_scan_missing_file() {
    let tmp = TempDir::new().unwrap();
    agriscan(&tmp)
        .args(["scan", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_unknown_format_rejected() {
    let tmp = TempDir::new().unwrap();
    let image = tmp.path().join("leaf.jpg");
    std::fs::write(&image, vec![0xFFu8; 64]).unwrap();

    agriscan(&tmp)
        .args(["--api-url", "http://127.0.0.1:1", "scan", "--format", "jsno"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'jsno'"));
}

#[test]
fn test_config_init_writes_file() {
    let tmp = TempDir::new().unwrap();
    agriscan(&tmp)
        .args(["--api-url", "https://scan.example.com", "config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url = \"https://scan.example.com\""));

    let written = std::fs::read_to_string(tmp.path().join("agriscan").join("config.toml")).unwrap();
    assert!(written.contains("max_file_size_mb = 25"));

    // The saved file is picked up on the next run
    agriscan(&tmp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://scan.example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scan_json_output() {
    let url = MockService::default().spawn().await;
    let tmp = TempDir::new().unwrap();
    let image = tmp.path().join("leaf.jpg");
    std::fs::write(&image, vec![0xFFu8; 4096]).unwrap();

    let mut cmd = agriscan(&tmp);
    cmd.args(["--api-url", url.as_str(), "scan", "--format", "json"])
        .arg(&image);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"Succeeded\""))
        .stdout(predicate::str::contains("\"framing\": \"healthy\""))
        .stdout(predicate::str::contains("\"confidence_percent\": 95.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scan_server_failure_exits_nonzero() {
    let url = MockService::default()
        .predict(StatusCode::INTERNAL_SERVER_ERROR, "{}")
        .spawn()
        .await;
    let tmp = TempDir::new().unwrap();
    let image = tmp.path().join("leaf.png");
    std::fs::write(&image, vec![0x89u8; 128]).unwrap();

    let mut cmd = agriscan(&tmp);
    cmd.args(["--api-url", url.as_str(), "scan"]).arg(&image);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .failure()
        .stderr(predicate::str::contains("prediction failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_json_output() {
    let url = MockService::default()
        .history(
            StatusCode::OK,
            json!({
                "total": 3,
                "results": [
                    history_record("Healthy", 0.9),
                    history_record("Tomato Late Blight", 0.4),
                    history_record("Potato Early Blight", 0.6)
                ]
            }),
        )
        .spawn()
        .await;
    let tmp = TempDir::new().unwrap();

    let mut cmd = agriscan(&tmp);
    cmd.args(["--api-url", url.as_str(), "history", "--format", "json"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mean_confidence_percent\": 63"))
        .stdout(predicate::str::contains("\"issue_count\": 2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_table_output() {
    let url = MockService::default().spawn().await;
    let tmp = TempDir::new().unwrap();

    let mut cmd = agriscan(&tmp);
    cmd.args(["--api-url", url.as_str(), "history"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("SCAN HISTORY"))
        .stdout(predicate::str::contains("No predictions yet"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_command() {
    let url = MockService::default().spawn().await;
    let tmp = TempDir::new().unwrap();

    let mut cmd = agriscan(&tmp);
    cmd.args(["--api-url", url.as_str(), "health"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("AgriScan AI"));
}
