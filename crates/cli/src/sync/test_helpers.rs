// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sk_core::{OperationKind, Payload, SyncOperation};
use tokio::sync::Semaphore;
use tokio::time::Instant;

use super::settings::{SettingsError, SettingsResult, SettingsStore};
use super::uploader::{UploadError, UploadFuture, Uploader};

/// Create an operation whose payload is the UTF-8 bytes of `tag`.
pub fn make_op(kind: OperationKind, tag: &str) -> SyncOperation {
    SyncOperation::new(kind, Some(Payload::bytes(tag)), Utc::now())
}

/// Recover the tags of operations built by [`make_op`].
pub fn payload_tags(ops: &[SyncOperation]) -> Vec<String> {
    ops.iter().map(|op| tag_of(op.payload.as_ref())).collect()
}

fn tag_of(payload: Option<&Payload>) -> String {
    match payload {
        Some(Payload::Bytes(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        Some(Payload::File(path)) => path.display().to_string(),
        None => String::new(),
    }
}

/// One recorded upload attempt.
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub kind: OperationKind,
    pub tag: String,
    pub at: Instant,
}

/// Uploader with scripted outcomes.
///
/// Calls are numbered from 1 in the order they start.
#[derive(Default)]
pub struct MockUploader {
    calls: Mutex<Vec<UploadCall>>,
    fail_calls: Mutex<HashSet<usize>>,
    fail_tags: Mutex<HashSet<String>>,
    fail_all: AtomicBool,
    gate: Option<Arc<Semaphore>>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// An uploader whose calls block until the returned semaphore is given
    /// permits, one per call.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let uploader = MockUploader {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (uploader, gate)
    }

    /// Fail the given 1-based call numbers.
    pub fn fail_calls(self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.fail_calls.lock().unwrap().extend(calls);
        self
    }

    /// Fail every attempt for operations with the given payload tag.
    pub fn fail_tag(&self, tag: &str) {
        self.fail_tags.lock().unwrap().insert(tag.to_string());
    }

    pub fn clear_failing_tags(&self) {
        self.fail_tags.lock().unwrap().clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.tag).collect()
    }
}

impl Uploader for MockUploader {
    fn upload<'a>(&'a self, kind: OperationKind, payload: Option<&'a Payload>) -> UploadFuture<'a> {
        Box::pin(async move {
            let tag = tag_of(payload);
            let number = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(UploadCall {
                    kind,
                    tag: tag.clone(),
                    at: Instant::now(),
                });
                calls.len()
            };

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }

            let fail = self.fail_all.load(Ordering::SeqCst)
                || self.fail_calls.lock().unwrap().contains(&number)
                || self.fail_tags.lock().unwrap().contains(&tag);
            if fail {
                Err(UploadError::Status {
                    status: 500,
                    body: format!("scripted failure for call {number}"),
                })
            } else {
                Ok(())
            }
        })
    }
}

/// Settings store whose writes always fail.
#[derive(Default)]
pub struct BrokenSettings;

impl SettingsStore for BrokenSettings {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> SettingsResult<()> {
        Err(SettingsError::Io(std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> SettingsResult<()> {
        Err(SettingsError::Io(std::io::Error::other("disk full")))
    }
}
