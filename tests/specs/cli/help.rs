// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for help and version output.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use yare::parameterized;

fn sk() -> Command {
    cargo_bin_cmd!("sidekick")
}

#[test]
fn version_flag_outputs_version() {
    sk().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sidekick"))
        .stdout(predicate::str::is_match(r"[0-9]+\.[0-9]+\.[0-9]+").unwrap());
}

#[parameterized(
    enqueue = { "enqueue" },
    status = { "status" },
    sync = { "sync" },
    offline = { "offline" },
    watch = { "watch" },
)]
fn help_lists_subcommand(name: &str) {
    sk().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(name));
}

#[test]
fn enqueue_help_shows_examples() {
    sk().args(["enqueue", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn missing_subcommand_fails() {
    sk().assert().failure();
}
