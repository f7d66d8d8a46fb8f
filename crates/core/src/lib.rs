// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sk-core: Shared library for the Sidekick offline sync queue
//!
//! This crate provides the data model of queued sync operations and the small
//! primitives (clock, JSONL storage) used by the sync coordinator and the
//! `sidekick` CLI.

pub mod clock;
pub mod error;
pub mod jsonl;
pub mod op;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use op::{OpId, OperationKind, Payload, SyncOperation};
