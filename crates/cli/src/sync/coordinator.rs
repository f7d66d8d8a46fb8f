// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drain coordination.
//!
//! [`SyncCoordinator`] owns the pending-operation queue and the sync state.
//! A drain pass snapshots the queue, uploads each operation in order, then
//! removes the ones that succeeded in a single batch. Failed operations stay
//! where they were and are retried by a later pass.
//!
//! Passes are started by three triggers:
//!
//! - an explicit [`SyncCoordinator::sync`] call,
//! - the connectivity monitor reporting an offline→online edge,
//! - an enqueue while online.
//!
//! The last two are handled by the background [`SyncWorker`]. At most one
//! pass runs at a time; a trigger that arrives during a pass is dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sk_core::{Clock, OpId, OperationKind, Payload, SyncOperation, SystemClock};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::connectivity::{ConnectionType, ConnectivityEvents, ConnectivityMonitor};
use super::queue::OperationStore;
use super::settings::{SettingsExt, SettingsStore, LAST_SYNC_DATE_KEY, OFFLINE_MODE_KEY};
use super::uploader::Uploader;

/// What started a drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainTrigger {
    /// Explicit user request.
    Manual,
    /// Connectivity came back.
    Reconnected,
    /// An operation was enqueued while online.
    Enqueued,
    /// The background worker started.
    Startup,
}

impl DrainTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainTrigger::Manual => "manual",
            DrainTrigger::Reconnected => "reconnected",
            DrainTrigger::Enqueued => "enqueued",
            DrainTrigger::Startup => "startup",
        }
    }
}

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrainReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Result of a drain request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// A pass ran over a non-empty snapshot.
    Completed(DrainReport),
    /// The queue was empty; nothing was uploaded.
    Empty,
    /// Connectivity is down or offline mode is on.
    Offline,
    /// Another pass was already running.
    AlreadySyncing,
}

/// Read-only view of the sync state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub last_sync_completed_at: Option<DateTime<Utc>>,
    pub pending_count: usize,
    pub is_connected: bool,
    pub connection_type: ConnectionType,
    pub offline_mode: bool,
}

/// Delay applied to enqueue-triggered passes after a pass where every
/// upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
        }
    }
}

/// Owns the queue and runs drain passes against an [`Uploader`].
pub struct SyncCoordinator<Q: OperationStore> {
    queue: Mutex<Q>,
    monitor: ConnectivityMonitor,
    uploader: Arc<dyn Uploader>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    syncing: AtomicBool,
    offline_mode: AtomicBool,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    status_tx: watch::Sender<SyncStatus>,
    /// Signalled on enqueue while online.
    enqueued: Notify,
    /// Signalled when offline mode is turned off while the network is up.
    resumed: Notify,
}

impl<Q: OperationStore> SyncCoordinator<Q> {
    /// Build a coordinator, restoring the last completion time and offline
    /// mode from `settings`.
    pub fn new(
        queue: Q,
        monitor: ConnectivityMonitor,
        uploader: Arc<dyn Uploader>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        let last_sync = settings.get_timestamp(LAST_SYNC_DATE_KEY);
        let offline_mode = settings.get_flag(OFFLINE_MODE_KEY);
        let connectivity = monitor.current_status();
        let initial = SyncStatus {
            is_syncing: false,
            last_sync_completed_at: last_sync,
            pending_count: queue.count(),
            is_connected: connectivity.is_connected,
            connection_type: connectivity.connection_type,
            offline_mode,
        };
        let (status_tx, _) = watch::channel(initial);

        SyncCoordinator {
            queue: Mutex::new(queue),
            monitor,
            uploader,
            settings,
            clock: Arc::new(SystemClock),
            syncing: AtomicBool::new(false),
            offline_mode: AtomicBool::new(offline_mode),
            last_sync: Mutex::new(last_sync),
            status_tx,
            enqueued: Notify::new(),
            resumed: Notify::new(),
        }
    }

    /// Replace the clock used for operation and completion timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Append a new operation to the queue.
    ///
    /// Never blocks on the network. If connectivity is up the background
    /// worker is woken to drain.
    pub fn enqueue(&self, kind: OperationKind, payload: Option<Payload>) -> OpId {
        let op = SyncOperation::new(kind, payload, self.clock.now());
        let id = op.id;
        self.lock_queue().enqueue(op);
        tracing::debug!(%id, %kind, "enqueued operation");

        self.publish();
        if self.is_online() {
            self.enqueued.notify_one();
        }
        id
    }

    /// Run one drain pass on explicit request.
    ///
    /// Unlike automatic triggers, an empty queue still counts as a completed
    /// sync.
    pub async fn sync(&self) -> DrainOutcome {
        self.drain(DrainTrigger::Manual).await
    }

    /// Run one drain pass.
    pub async fn drain(&self, trigger: DrainTrigger) -> DrainOutcome {
        let Some(guard) = SyncingGuard::acquire(self) else {
            tracing::debug!(trigger = trigger.as_str(), "drain already running, ignoring trigger");
            return DrainOutcome::AlreadySyncing;
        };

        if !self.is_online() {
            tracing::debug!(
                trigger = trigger.as_str(),
                offline_mode = self.offline_mode(),
                "offline, skipping drain"
            );
            return DrainOutcome::Offline;
        }

        let snapshot = self.lock_queue().snapshot();
        if snapshot.is_empty() {
            tracing::debug!(trigger = trigger.as_str(), "queue empty");
            if trigger == DrainTrigger::Manual {
                self.record_completion();
            }
            return DrainOutcome::Empty;
        }

        self.publish();
        tracing::debug!(trigger = trigger.as_str(), pending = snapshot.len(), "draining queue");

        let mut succeeded: HashSet<OpId> = HashSet::new();
        let mut failed = 0;
        for op in &snapshot {
            match self.uploader.upload(op.kind, op.payload.as_ref()).await {
                Ok(()) => {
                    succeeded.insert(op.id);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(id = %op.id, kind = %op.kind, error = %e, "upload failed, keeping operation queued");
                }
            }
        }

        if !succeeded.is_empty() {
            self.lock_queue().remove(&succeeded);
        }
        self.record_completion();

        let report = DrainReport {
            attempted: snapshot.len(),
            succeeded: succeeded.len(),
            failed,
        };
        tracing::info!(
            trigger = trigger.as_str(),
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "drain pass complete"
        );

        drop(guard);
        DrainOutcome::Completed(report)
    }

    pub fn status(&self) -> SyncStatus {
        let connectivity = self.monitor.current_status();
        SyncStatus {
            is_syncing: self.is_syncing(),
            last_sync_completed_at: self.last_sync_completed_at(),
            pending_count: self.pending_count(),
            is_connected: connectivity.is_connected,
            connection_type: connectivity.connection_type,
            offline_mode: self.offline_mode(),
        }
    }

    /// Watch status changes. Values are published on enqueue, at the start
    /// and end of each pass, on offline-mode changes, and on connectivity
    /// edges seen by a running worker.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    pub fn last_sync_completed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pending_count(&self) -> usize {
        self.lock_queue().count()
    }

    /// Snapshot of the queued operations in drain order.
    pub fn pending(&self) -> Vec<SyncOperation> {
        self.lock_queue().snapshot()
    }

    pub fn offline_mode(&self) -> bool {
        self.offline_mode.load(Ordering::SeqCst)
    }

    /// Force offline behavior on or off. The flag is persisted best-effort.
    pub fn set_offline_mode(&self, enabled: bool) {
        let previous = self.offline_mode.swap(enabled, Ordering::SeqCst);
        if let Err(e) = self.settings.set_flag(OFFLINE_MODE_KEY, enabled) {
            tracing::warn!(error = %e, "failed to persist offline mode");
        }
        if previous == enabled {
            return;
        }

        tracing::debug!(enabled, "offline mode changed");
        self.publish();
        if !enabled && self.monitor.is_connected() {
            self.resumed.notify_one();
        }
    }

    /// Whether a pass would be allowed to upload right now.
    pub fn is_online(&self) -> bool {
        self.monitor.is_connected() && !self.offline_mode()
    }

    fn record_completion(&self) {
        let now = self.clock.now();
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner()) = Some(now);
        if let Err(e) = self.settings.set_timestamp(LAST_SYNC_DATE_KEY, now) {
            tracing::warn!(error = %e, "failed to persist last sync date");
        }
    }

    fn publish(&self) {
        let status = self.status();
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
    }

    fn lock_queue(&self) -> MutexGuard<'_, Q> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<Q: OperationStore + 'static> SyncCoordinator<Q> {
    /// Start the background worker with the default backoff.
    pub fn spawn(self: &Arc<Self>) -> SyncWorker {
        self.spawn_with(BackoffConfig::default())
    }

    /// Start the background worker.
    ///
    /// The worker runs one startup pass, then drains on every reconnect and
    /// every enqueue-while-online until shut down.
    pub fn spawn_with(self: &Arc<Self>, backoff: BackoffConfig) -> SyncWorker {
        let cancel = CancellationToken::new();
        let events = self.monitor.subscribe();
        let coordinator = Arc::clone(self);
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            coordinator.run_worker(events, backoff, token).await;
        });
        SyncWorker { cancel, handle }
    }

    async fn run_worker(
        self: Arc<Self>,
        mut events: ConnectivityEvents,
        backoff: BackoffConfig,
        cancel: CancellationToken,
    ) {
        let mut retry = RetryState::new(backoff);
        let outcome = self.drain_from_worker(DrainTrigger::Startup, &cancel).await;
        retry.record(&outcome);

        // Set when an enqueue arrived during backoff.
        let mut deferred = false;

        loop {
            let retry_at = retry.ready_at;
            let wake_at = retry_at.unwrap_or_else(Instant::now);

            let trigger = tokio::select! {
                _ = cancel.cancelled() => break,
                change = events.next() => {
                    let Some(change) = change else { break };
                    self.publish();
                    if !change.came_online() {
                        continue;
                    }
                    DrainTrigger::Reconnected
                }
                _ = self.resumed.notified() => DrainTrigger::Reconnected,
                _ = self.enqueued.notified() => {
                    if retry_at.is_some_and(|at| at > Instant::now()) {
                        tracing::debug!("backing off after failed pass");
                        deferred = true;
                        continue;
                    }
                    DrainTrigger::Enqueued
                }
                _ = tokio::time::sleep_until(wake_at), if deferred && retry_at.is_some() => {
                    DrainTrigger::Enqueued
                }
            };

            deferred = false;
            let outcome = self.drain_from_worker(trigger, &cancel).await;
            retry.record(&outcome);
        }

        tracing::debug!("sync worker stopped");
    }

    /// Drain for a worker trigger. If another pass (a manual `sync()`) holds
    /// the queue, wait for it to end and drain once more, since operations
    /// enqueued meanwhile are not in its snapshot.
    async fn drain_from_worker(
        &self,
        trigger: DrainTrigger,
        cancel: &CancellationToken,
    ) -> DrainOutcome {
        let outcome = self.drain(trigger).await;
        if outcome != DrainOutcome::AlreadySyncing {
            return outcome;
        }

        tracing::debug!(
            trigger = trigger.as_str(),
            "pass already running, draining again when it ends"
        );
        let mut status = self.subscribe();
        tokio::select! {
            _ = cancel.cancelled() => return outcome,
            _ = status.wait_for(|s| !s.is_syncing) => {}
        }
        self.drain(trigger).await
    }
}

/// Handle to a running background worker.
pub struct SyncWorker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SyncWorker {
    /// Stop waiting for new triggers and wait for the worker to exit. A pass
    /// already in flight runs to completion first.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "sync worker panicked");
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Clears the syncing flag and republishes status when a pass ends, even if
/// the pass future is dropped.
struct SyncingGuard<'a, Q: OperationStore> {
    coordinator: &'a SyncCoordinator<Q>,
}

impl<'a, Q: OperationStore> SyncingGuard<'a, Q> {
    fn acquire(coordinator: &'a SyncCoordinator<Q>) -> Option<Self> {
        coordinator
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SyncingGuard { coordinator })
    }
}

impl<Q: OperationStore> Drop for SyncingGuard<'_, Q> {
    fn drop(&mut self) {
        self.coordinator.syncing.store(false, Ordering::SeqCst);
        self.coordinator.publish();
    }
}

/// Exponential backoff state for enqueue-triggered passes.
#[derive(Debug)]
struct RetryState {
    config: BackoffConfig,
    delay: Option<Duration>,
    ready_at: Option<Instant>,
}

impl RetryState {
    fn new(config: BackoffConfig) -> Self {
        RetryState {
            config,
            delay: None,
            ready_at: None,
        }
    }

    fn record(&mut self, outcome: &DrainOutcome) {
        match outcome {
            DrainOutcome::Completed(report) if report.succeeded == 0 && report.failed > 0 => {
                let next = match self.delay {
                    None => self.config.initial,
                    Some(delay) => delay.saturating_mul(2).min(self.config.max),
                };
                self.delay = Some(next);
                self.ready_at = Some(Instant::now() + next);
            }
            DrainOutcome::Completed(_) | DrainOutcome::Empty => {
                self.delay = None;
                self.ready_at = None;
            }
            DrainOutcome::Offline | DrainOutcome::AlreadySyncing => {}
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
