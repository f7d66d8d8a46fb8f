// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::sync::{QueueError, SettingsError, UploadError};

/// All possible errors that can occur in the sksync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid upload endpoint '{endpoint}': {reason}\n  hint: set [upload] endpoint in config.toml to an http:// or https:// URL")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("no data directory available\n  hint: pass --data-dir or set SIDEKICK_DATA_DIR")]
    NoDataDir,

    #[error("queue {} is in use by another sidekick process\n  hint: stop 'sidekick watch' and try again", .0.display())]
    QueueBusy(PathBuf),

    #[error("payload file not found: {0}")]
    PayloadNotFound(String),

    #[error(transparent)]
    Core(#[from] sk_core::Error),

    #[error(transparent)]
    Queue(QueueError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::Locked(path) => Error::QueueBusy(path),
            other => Error::Queue(other),
        }
    }
}

/// A specialized Result type for sksync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
