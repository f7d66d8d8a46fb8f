// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `sidekick status` and `sidekick offline`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sk(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sidekick");
    cmd.arg("--data-dir")
        .arg(temp.path())
        .env_remove("SIDEKICK_DATA_DIR")
        .env_remove("SIDEKICK_UPLOAD_ENDPOINT")
        .env_remove("SIDEKICK_AUTH_TOKEN");
    cmd
}

fn status_json(temp: &TempDir) -> serde_json::Value {
    let output = sk(temp).args(["status", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn status_on_fresh_data_dir() {
    let temp = TempDir::new().unwrap();
    sk(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0"))
        .stdout(predicate::str::contains("Last sync: never"))
        .stdout(predicate::str::contains("Offline mode: off"));
}

#[test]
fn status_lists_pending_operations() {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(["enqueue", "photo", "-d", "P1"]).assert().success();
    sk(&temp).args(["enqueue", "claim"]).assert().success();

    sk(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 2"))
        .stdout(predicate::str::contains("upload_photo"))
        .stdout(predicate::str::contains("sync_claim"));

    let status = status_json(&temp);
    assert_eq!(status["pending_count"], 2);
    assert_eq!(status["pending"][0]["kind"], "upload_photo");
    assert!(status["last_sync_completed_at"].is_null());
}

#[test]
fn status_shows_configured_endpoint() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[upload]\nendpoint = \"https://claims.example.com/v1\"\n",
    )
    .unwrap();

    sk(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Endpoint: https://claims.example.com/v1",
        ));
}

#[test]
fn status_endpoint_env_overrides_config() {
    let temp = TempDir::new().unwrap();
    sk(&temp)
        .env("SIDEKICK_UPLOAD_ENDPOINT", "https://env.example.com/v1")
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example.com/v1"));
}

#[test]
fn offline_switch_round_trips() {
    let temp = TempDir::new().unwrap();

    sk(&temp)
        .args(["offline", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline mode on"));
    assert_eq!(status_json(&temp)["offline_mode"], true);

    sk(&temp)
        .args(["offline", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline mode off"));
    assert_eq!(status_json(&temp)["offline_mode"], false);
}

#[test]
fn offline_rejects_unknown_switch() {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(["offline", "maybe"]).assert().failure();
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[upload\n").unwrap();

    sk(&temp)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}
