// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_kind = { Error::InvalidKind("video".into()), "video" },
    invalid_kind_hint = { Error::InvalidKind("video".into()), "fnol, photo, lidar, claim" },
    invalid_op_id = { Error::InvalidOpId("not-a-uuid".into()), "not-a-uuid" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().starts_with("io error"));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
