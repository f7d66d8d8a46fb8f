// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sk_core::{jsonl, OpId, OperationKind, Payload, SyncOperation};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{SettingsExt, LAST_SYNC_DATE_KEY, OFFLINE_MODE_KEY};

use super::Context;

/// Persisted sync state as seen from disk.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub pending_count: usize,
    pub last_sync_completed_at: Option<DateTime<Utc>>,
    pub offline_mode: bool,
    pub endpoint: String,
    pub pending: Vec<PendingEntry>,
}

#[derive(Debug, Serialize)]
pub struct PendingEntry {
    pub id: OpId,
    pub kind: OperationKind,
    pub enqueued_at: DateTime<Utc>,
    pub payload: String,
}

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let report = collect(ctx)?;
    match output {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Reads the queue file without taking the queue lock, so status works
/// while `sidekick watch` is running.
pub(crate) fn collect(ctx: &Context) -> Result<StatusReport> {
    let ops = jsonl::read_recovering::<SyncOperation>(&ctx.queue_path())?.records;
    let mut seen = HashSet::new();
    let pending: Vec<PendingEntry> = ops
        .into_iter()
        .filter(|op| seen.insert(op.id))
        .map(|op| PendingEntry {
            id: op.id,
            kind: op.kind,
            enqueued_at: op.enqueued_at,
            payload: describe_payload(op.payload.as_ref()),
        })
        .collect();

    let settings = ctx.open_settings();
    Ok(StatusReport {
        pending_count: pending.len(),
        last_sync_completed_at: settings.get_timestamp(LAST_SYNC_DATE_KEY),
        offline_mode: settings.get_flag(OFFLINE_MODE_KEY),
        endpoint: ctx.config.upload.endpoint.clone(),
        pending,
    })
}

pub(crate) fn render_text(report: &StatusReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Pending: {}\n", report.pending_count));
    let last = report
        .last_sync_completed_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    out.push_str(&format!("Last sync: {}\n", last));
    out.push_str(&format!(
        "Offline mode: {}\n",
        if report.offline_mode { "on" } else { "off" }
    ));
    out.push_str(&format!("Endpoint: {}\n", report.endpoint));

    if !report.pending.is_empty() {
        out.push('\n');
        for entry in &report.pending {
            out.push_str(&format!(
                "  {}  {:<17}  {}  {}\n",
                entry.id,
                entry.kind.as_str(),
                entry.enqueued_at.format("%Y-%m-%d %H:%M:%S"),
                entry.payload
            ));
        }
    }
    out
}

fn describe_payload(payload: Option<&Payload>) -> String {
    match payload {
        None => "-".to_string(),
        Some(Payload::Bytes(bytes)) => format!("{} bytes", bytes.len()),
        Some(Payload::File(path)) => path.display().to_string(),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
