// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use chrono::Utc;
use sk_core::{OperationKind, Payload, SyncOperation};

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::sync::OperationStore;

use super::Context;

/// Queue one operation and print its id.
pub fn run(
    ctx: &Context,
    kind: OperationKind,
    file: Option<PathBuf>,
    data: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let op = enqueue(ctx, kind, file, data)?;
    match output {
        OutputFormat::Text => println!("{}", op.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&op)?),
    }
    Ok(())
}

pub(crate) fn enqueue(
    ctx: &Context,
    kind: OperationKind,
    file: Option<PathBuf>,
    data: Option<String>,
) -> Result<SyncOperation> {
    let payload = payload_from(file, data)?;
    let mut queue = ctx.open_queue()?;
    let op = SyncOperation::new(kind, payload, Utc::now());
    queue.try_enqueue(op.clone())?;
    tracing::debug!(id = %op.id, %kind, pending = queue.count(), "queued operation");
    Ok(op)
}

/// File payloads are stored by absolute path and read at upload time.
fn payload_from(file: Option<PathBuf>, data: Option<String>) -> Result<Option<Payload>> {
    if let Some(path) = file {
        let absolute = path
            .canonicalize()
            .map_err(|_| Error::PayloadNotFound(path.display().to_string()))?;
        if !absolute.is_file() {
            return Err(Error::PayloadNotFound(path.display().to_string()));
        }
        return Ok(Some(Payload::file(absolute)));
    }
    Ok(data.map(|d| Payload::bytes(d.into_bytes())))
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
