// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sk_core::OperationKind;

/// Parse an operation kind from its name or short alias.
fn parse_kind(s: &str) -> Result<OperationKind, String> {
    s.parse().map_err(|e: sk_core::Error| e.to_string())
}

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Offline mode switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

#[derive(Parser)]
#[command(name = "sidekick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline upload queue for field inspections")]
#[command(
    long_about = "Offline upload queue for field inspections.\n\n\
    Captured FNOL documents, photos, LiDAR scans and claim updates are queued locally \
    and uploaded once the upload service is reachable."
)]
pub struct Cli {
    /// Directory holding the queue, settings and config
    #[arg(long = "data-dir", global = true, value_name = "path")]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue an operation for upload
    #[command(after_help = "\
Examples:
  sidekick enqueue photo --file IMG_0042.jpg      Queue a photo from disk
  sidekick enqueue fnol --data '{\"claim\":\"C1\"}'  Queue an inline FNOL document
  sidekick enqueue claim                          Queue a claim sync with no payload")]
    Enqueue {
        /// Operation kind (fnol, photo, lidar, claim)
        #[arg(value_parser = parse_kind)]
        kind: OperationKind,

        /// Upload the contents of this file
        #[arg(long, short = 'f', value_name = "path", conflicts_with = "data")]
        file: Option<PathBuf>,

        /// Upload this string
        #[arg(long, short = 'd', value_parser = non_empty_string)]
        data: Option<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show queue and sync status
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Probe connectivity and run one drain pass now
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Turn offline mode on or off
    Offline {
        #[arg(value_enum)]
        switch: Switch,
    },

    /// Probe connectivity and drain automatically until interrupted
    Watch,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
