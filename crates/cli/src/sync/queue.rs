// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue of pending sync operations.
//!
//! The queue preserves enqueue order and only ever loses an operation through
//! an explicit [`OperationStore::remove`]. [`JsonlQueue`] additionally keeps
//! the operations in a JSONL file so failed uploads survive a restart.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use sk_core::{jsonl, OpId, SyncOperation};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be read back.
    #[error("failed to load queue: {0}")]
    Load(#[from] sk_core::Error),

    /// An operation could not be written to disk.
    #[error("failed to write queue: {0}")]
    Persist(sk_core::Error),

    /// Another process holds the queue.
    #[error("queue {0} is locked by another process")]
    Locked(PathBuf),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Ordered holding area for pending operations.
///
/// Mutations never fail from the caller's point of view; durable
/// implementations treat persistence as best-effort.
pub trait OperationStore: Send {
    /// Append an operation at the tail.
    fn enqueue(&mut self, op: SyncOperation);

    /// Current contents in enqueue order, without mutating the queue.
    fn snapshot(&self) -> Vec<SyncOperation>;

    /// Remove exactly the operations whose id is in `ids`.
    fn remove(&mut self, ids: &HashSet<OpId>);

    /// Number of pending operations.
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Process-lifetime queue.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    ops: Vec<SyncOperation>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperationStore for MemoryQueue {
    fn enqueue(&mut self, op: SyncOperation) {
        if contains(&self.ops, &op.id) {
            tracing::debug!(id = %op.id, "ignoring duplicate operation id");
            return;
        }
        self.ops.push(op);
    }

    fn snapshot(&self) -> Vec<SyncOperation> {
        self.ops.clone()
    }

    fn remove(&mut self, ids: &HashSet<OpId>) {
        self.ops.retain(|op| !ids.contains(&op.id));
    }

    fn count(&self) -> usize {
        self.ops.len()
    }
}

/// Queue persisted as JSONL, one operation per line.
///
/// The in-memory list is authoritative for the life of the process. Each
/// enqueue is appended and fsynced; removals rewrite the file. If a write
/// fails the error is logged and the next mutation rewrites the whole file.
/// Callers that must not report success for an unpersisted operation use
/// [`JsonlQueue::try_enqueue`].
pub struct JsonlQueue {
    /// Path to the queue file.
    path: PathBuf,
    ops: Vec<SyncOperation>,
    /// Set when the file no longer matches `ops`.
    needs_rewrite: bool,
    /// Held for the life of the queue; the lock is released on drop.
    _lock: File,
}

impl JsonlQueue {
    /// Create or open a queue at the given path, loading pending operations.
    ///
    /// Fails with [`QueueError::Locked`] if another process has it open.
    pub fn open(path: &Path) -> QueueResult<Self> {
        let lock_path = lock_path(path);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock.try_lock_exclusive()
            .map_err(|_| QueueError::Locked(path.to_path_buf()))?;

        // Ensure the file exists (create if not)
        OpenOptions::new().create(true).append(true).open(path)?;

        let recovered = jsonl::read_recovering::<SyncOperation>(path)?;
        let mut needs_rewrite = recovered.torn_tail;
        if recovered.torn_tail {
            tracing::warn!(path = %path.display(), "dropping partially written last line of offline queue");
        }

        let mut ops: Vec<SyncOperation> = Vec::new();
        for op in recovered.records {
            if contains(&ops, &op.id) {
                needs_rewrite = true;
                continue;
            }
            ops.push(op);
        }

        tracing::debug!(path = %path.display(), pending = ops.len(), "opened offline queue");

        let mut queue = JsonlQueue {
            path: path.to_path_buf(),
            ops,
            needs_rewrite,
            _lock: lock,
        };
        if queue.needs_rewrite {
            queue.rewrite();
        }
        Ok(queue)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an operation and fail if it could not be written to disk.
    ///
    /// On error the operation is not queued. A duplicate id is a no-op.
    pub fn try_enqueue(&mut self, op: SyncOperation) -> QueueResult<()> {
        if contains(&self.ops, &op.id) {
            tracing::debug!(id = %op.id, "ignoring duplicate operation id");
            return Ok(());
        }
        if let Err(e) = self.push_persisted(op) {
            self.ops.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Push `op` and write it out, rewriting the file if it is stale.
    /// `op` stays in memory either way.
    fn push_persisted(&mut self, op: SyncOperation) -> QueueResult<()> {
        self.ops.push(op);
        let written = match self.ops.last() {
            Some(op) if !self.needs_rewrite => jsonl::append(&self.path, op),
            _ => jsonl::write_all(&self.path, &self.ops),
        };
        match written {
            Ok(()) => {
                self.needs_rewrite = false;
                Ok(())
            }
            Err(e) => {
                // A failed append may leave a partial line behind.
                self.needs_rewrite = true;
                Err(QueueError::Persist(e))
            }
        }
    }

    fn rewrite(&mut self) {
        match jsonl::write_all(&self.path, &self.ops) {
            Ok(()) => self.needs_rewrite = false,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to rewrite offline queue");
                self.needs_rewrite = true;
            }
        }
    }
}

impl OperationStore for JsonlQueue {
    fn enqueue(&mut self, op: SyncOperation) {
        if contains(&self.ops, &op.id) {
            tracing::debug!(id = %op.id, "ignoring duplicate operation id");
            return;
        }

        let id = op.id;
        if let Err(e) = self.push_persisted(op) {
            tracing::warn!(%id, error = %e, "failed to persist queued operation");
        }
    }

    fn snapshot(&self) -> Vec<SyncOperation> {
        self.ops.clone()
    }

    fn remove(&mut self, ids: &HashSet<OpId>) {
        let before = self.ops.len();
        self.ops.retain(|op| !ids.contains(&op.id));
        if self.ops.len() != before || self.needs_rewrite {
            self.rewrite();
        }
    }

    fn count(&self) -> usize {
        self.ops.len()
    }
}

fn contains(ops: &[SyncOperation], id: &OpId) -> bool {
    ops.iter().any(|op| op.id == *id)
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
