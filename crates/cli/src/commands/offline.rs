// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::Switch;
use crate::error::Result;
use crate::sync::{SettingsExt, OFFLINE_MODE_KEY};

use super::Context;

/// Persist the offline-mode switch. A running `sidekick watch` picks the
/// change up on its next check.
pub fn run(ctx: &Context, switch: Switch) -> Result<()> {
    let enabled = switch.enabled();
    ctx.open_settings().set_flag(OFFLINE_MODE_KEY, enabled)?;
    println!("Offline mode {}", if enabled { "on" } else { "off" });
    Ok(())
}

#[cfg(test)]
#[path = "offline_tests.rs"]
mod tests;
