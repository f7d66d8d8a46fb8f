// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued sync operations.
//!
//! A [`SyncOperation`] is created when a producer (FNOL upload, photo capture,
//! LiDAR capture, claim edit) finishes a local action that still has to be
//! replicated to the server. Operations are immutable once created: the queue
//! only ever appends or removes them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier for a queued operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(Uuid);

impl OpId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        OpId(Uuid::new_v4())
    }
}

impl Default for OpId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OpId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(OpId)
            .map_err(|_| Error::InvalidOpId(s.to_string()))
    }
}

/// What a queued operation replicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// First Notice of Loss document upload.
    UploadFnol,
    /// Inspection photo upload.
    UploadPhoto,
    /// LiDAR room scan upload.
    UploadLidarScan,
    /// Claim record sync.
    SyncClaim,
}

impl OperationKind {
    /// All kinds, in declaration order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::UploadFnol,
        OperationKind::UploadPhoto,
        OperationKind::UploadLidarScan,
        OperationKind::SyncClaim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::UploadFnol => "upload_fnol",
            OperationKind::UploadPhoto => "upload_photo",
            OperationKind::UploadLidarScan => "upload_lidar_scan",
            OperationKind::SyncClaim => "sync_claim",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    /// Accepts the canonical snake_case name or the short form used on the
    /// command line (`fnol`, `photo`, `lidar`, `claim`).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "upload_fnol" | "fnol" => Ok(OperationKind::UploadFnol),
            "upload_photo" | "photo" => Ok(OperationKind::UploadPhoto),
            "upload_lidar_scan" | "lidar" | "lidar_scan" => Ok(OperationKind::UploadLidarScan),
            "sync_claim" | "claim" => Ok(OperationKind::SyncClaim),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// Data carried by an operation: inline bytes or a reference to a file
/// already saved by the producer (photos, scans).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    File(PathBuf),
}

impl Payload {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Payload::Bytes(data.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Payload::File(path.into())
    }
}

/// An operation waiting in the offline queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOperation {
    /// Unique identifier, assigned at creation.
    pub id: OpId,
    /// What this operation replicates.
    pub kind: OperationKind,
    /// Optional data to upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// When the producer queued the operation.
    pub enqueued_at: DateTime<Utc>,
}

impl SyncOperation {
    /// Creates a new operation with a freshly generated ID.
    pub fn new(kind: OperationKind, payload: Option<Payload>, enqueued_at: DateTime<Utc>) -> Self {
        SyncOperation {
            id: OpId::new(),
            kind,
            payload,
            enqueued_at,
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: AsRef<[u8]>, S: Serializer>(
        bytes: T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
