// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_is_close_to_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    let after = Utc::now();
    assert!(before <= now && now <= after);
}

#[test]
fn manual_clock_set_and_advance() {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(chrono::Duration::seconds(90));
    assert_eq!(clock.now(), start + chrono::Duration::seconds(90));

    let later = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
    clock.set(later);
    assert_eq!(clock.now(), later);
}

#[test]
fn clock_ref_delegates() {
    let start = Utc.timestamp_opt(5, 0).unwrap();
    let clock = ManualClock::new(start);
    let by_ref: &ManualClock = &clock;
    assert_eq!(Clock::now(&by_ref), start);
}
