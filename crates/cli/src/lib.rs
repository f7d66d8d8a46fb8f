// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sksync - offline upload queue for field inspections.
//!
//! This crate provides the library behind the `sidekick` CLI: captured work
//! is queued locally and delivered to the upload service once it is
//! reachable.
//!
//! # Main Components
//!
//! - [`sync::SyncCoordinator`] - owns the queue and runs drain passes
//! - [`sync::ConnectivityMonitor`] - latest reachability state and transitions
//! - [`sync::JsonlQueue`] / [`sync::MemoryQueue`] - pending operation stores
//! - [`sync::HttpUploader`] - posts operations to the upload service
//! - [`Config`] - data-directory configuration
//! - [`Error`] - error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sksync::sync::{ConnectivityMonitor, MemoryQueue, MemorySettings, SyncCoordinator};
//!
//! let monitor = ConnectivityMonitor::new();
//! let coordinator = Arc::new(SyncCoordinator::new(
//!     MemoryQueue::new(),
//!     monitor.clone(),
//!     uploader,
//!     Arc::new(MemorySettings::new()),
//! ));
//! let worker = coordinator.spawn();
//! coordinator.enqueue(OperationKind::UploadPhoto, Some(Payload::bytes(jpeg)));
//! ```

mod cli;
mod commands;
mod env;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, Switch};
pub use config::Config;
pub use error::{Error, Result};

use commands::Context;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let data_dir = config::resolve_data_dir(cli.data_dir)?;
    let ctx = Context::load(data_dir)?;
    run_command(&ctx, cli.command)
}

fn run_command(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Enqueue {
            kind,
            file,
            data,
            output,
        } => commands::enqueue::run(ctx, kind, file, data, output),
        Command::Status { output } => commands::status::run(ctx, output),
        Command::Sync { output } => commands::sync::run(ctx, output),
        Command::Offline { switch } => commands::offline::run(ctx, switch),
        Command::Watch => commands::watch::run(ctx),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
