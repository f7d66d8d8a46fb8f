// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync queue.
//!
//! Captured work (FNOL documents, photos, LiDAR scans, claim updates) is
//! queued locally and delivered to the upload service once the network is
//! reachable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  edges   ┌──────────────────┐  upload   ┌─────────────┐
//! │ Reachability│─────────►│ SyncCoordinator  │──────────►│  Uploader   │
//! │   Probe     │ Monitor  │  (+ SyncWorker)  │  (trait)  │ (HTTP/mock) │
//! └─────────────┘          └──────────────────┘           └─────────────┘
//!                            │             │
//!                            ▼             ▼
//!                    ┌─────────────┐ ┌─────────────┐
//!                    │   Queue     │ │  Settings   │
//!                    │ (JSONL/mem) │ │ (JSON/mem)  │
//!                    └─────────────┘ └─────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO queue that only drops operations after a successful upload
//! - Durable JSONL queue with single-writer locking
//! - Drain on reconnect, on enqueue while online, and on request
//! - Single-flight drain passes with a `watch` status channel
//! - Backoff for enqueue-triggered passes after total failure
//! - Injectable uploader, settings store and clock for testing

mod connectivity;
mod coordinator;
mod probe;
mod queue;
mod settings;
mod uploader;

pub use connectivity::{
    ConnectionType, ConnectivityChange, ConnectivityEvents, ConnectivityMonitor,
    ConnectivityStatus, PathUpdate,
};
pub use coordinator::{
    BackoffConfig, DrainOutcome, DrainReport, DrainTrigger, SyncCoordinator, SyncStatus,
    SyncWorker,
};
pub use probe::{ProbeConfig, ReachabilityProbe};
pub use queue::{JsonlQueue, MemoryQueue, OperationStore, QueueError, QueueResult};
pub use settings::{
    FileSettings, MemorySettings, SettingsError, SettingsExt, SettingsResult, SettingsStore,
    LAST_SYNC_DATE_KEY, OFFLINE_MODE_KEY,
};
pub use uploader::{
    route, HttpUploader, HttpUploaderConfig, UploadError, UploadFuture, UploadResult, Uploader,
};

#[cfg(test)]
mod test_helpers;
