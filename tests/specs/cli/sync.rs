// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `sidekick sync` when no upload happens.
//!
//! Uploads against a live server are covered by the library tests.

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

/// Point uploads at a port nothing listens on.
fn unreachable_config(temp: &TempDir) {
    std::fs::write(
        temp.path().join("config.toml"),
        "[upload]\nendpoint = \"http://127.0.0.1:9/v1\"\n\n\
         [connectivity]\nprobe_timeout_ms = 200\n",
    )
    .unwrap();
}

#[test]
fn sync_in_offline_mode_keeps_queue() {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(["enqueue", "fnol", "-d", "doc"]).assert().success();
    sk(&temp).args(["offline", "on"]).assert().success();

    sk(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline mode is on; 1 operations pending"));

    sk(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 1"))
        .stdout(predicate::str::contains("Last sync: never"));
}

#[test]
fn sync_with_unreachable_service_keeps_queue() {
    let temp = TempDir::new().unwrap();
    unreachable_config(&temp);
    sk(&temp).args(["enqueue", "photo", "-d", "P1"]).assert().success();

    sk(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Upload service unreachable"));

    sk(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 1"));
}

#[test]
fn sync_json_reports_offline_outcome() {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(["offline", "on"]).assert().success();

    let output = sk(&temp).args(["sync", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "offline");
    assert_eq!(json["offline_mode"], true);
    assert_eq!(json["pending_count"], 0);
}

#[test]
fn sync_rejects_invalid_endpoint() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[upload]\nendpoint = \"ftp://files.example.com\"\n",
    )
    .unwrap();

    sk(&temp)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid upload endpoint"))
        .stderr(predicate::str::contains("hint:"));
}
