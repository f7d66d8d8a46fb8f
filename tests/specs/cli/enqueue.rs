// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `sidekick enqueue`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn sk(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sidekick");
    cmd.arg("--data-dir")
        .arg(temp.path())
        .env_remove("SIDEKICK_DATA_DIR")
        .env_remove("SIDEKICK_UPLOAD_ENDPOINT")
        .env_remove("SIDEKICK_AUTH_TOKEN");
    cmd
}

fn queue_lines(temp: &TempDir) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(temp.path().join("queue.jsonl")).unwrap_or_default();
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[parameterized(
    fnol = { "fnol", "upload_fnol" },
    photo = { "photo", "upload_photo" },
    lidar = { "lidar", "upload_lidar_scan" },
    claim = { "claim", "sync_claim" },
    canonical = { "upload_photo", "upload_photo" },
)]
fn enqueue_accepts_kind(arg: &str, stored: &str) {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(["enqueue", arg]).assert().success();

    let ops = queue_lines(&temp);
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0]["kind"], stored);
}

#[test]
fn enqueue_prints_operation_id() {
    let temp = TempDir::new().unwrap();
    let output = sk(&temp)
        .args(["enqueue", "fnol", "--data", "{\"claim\":\"C1\"}"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let ops = queue_lines(&temp);
    assert_eq!(ops[0]["id"], id.as_str());
}

#[test]
fn enqueue_json_output_describes_operation() {
    let temp = TempDir::new().unwrap();
    let output = sk(&temp)
        .args(["enqueue", "claim", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let op: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(op["kind"], "sync_claim");
    assert!(op["enqueued_at"].is_string());
}

#[test]
fn enqueue_keeps_fifo_order() {
    let temp = TempDir::new().unwrap();
    for kind in ["photo", "lidar", "fnol"] {
        sk(&temp).args(["enqueue", kind]).assert().success();
    }

    let kinds: Vec<String> = queue_lines(&temp)
        .iter()
        .map(|op| op["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["upload_photo", "upload_lidar_scan", "upload_fnol"]);
}

#[test]
fn enqueue_file_payload_stores_path() {
    let temp = TempDir::new().unwrap();
    let photo = temp.path().join("IMG_0042.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    sk(&temp)
        .args(["enqueue", "photo", "--file"])
        .arg(&photo)
        .assert()
        .success();

    let ops = queue_lines(&temp);
    assert_eq!(ops[0]["payload"]["type"], "file");
}

#[test]
fn enqueue_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    sk(&temp)
        .args(["enqueue", "photo", "--file", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("payload file not found"));
    assert!(queue_lines(&temp).is_empty());
}

#[parameterized(
    unknown_kind = { &["enqueue", "video"] },
    empty_data = { &["enqueue", "fnol", "--data", "  "] },
    file_and_data = { &["enqueue", "photo", "--file", "a.jpg", "--data", "x"] },
)]
fn enqueue_rejects_bad_arguments(args: &[&str]) {
    let temp = TempDir::new().unwrap();
    sk(&temp).args(args).assert().failure();
}
