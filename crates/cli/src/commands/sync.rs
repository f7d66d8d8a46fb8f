// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, DrainOutcome, OperationStore, ReachabilityProbe, SyncCoordinator,
};

use super::{runtime, Context};

/// Probe connectivity once, then run a single drain pass.
pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    runtime()?.block_on(run_async(ctx, output))?;
    Ok(())
}

pub(crate) async fn run_async(ctx: &Context, output: OutputFormat) -> Result<DrainOutcome> {
    let monitor = ConnectivityMonitor::new();
    let probe = ReachabilityProbe::new(ctx.config.probe_config()?, monitor.clone());
    let coordinator = ctx.open_coordinator(monitor)?;
    if !coordinator.offline_mode() {
        probe.probe_once().await;
    }

    let outcome = coordinator.sync().await;
    match output {
        OutputFormat::Text => println!("{}", describe(&coordinator, outcome)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome_json(&coordinator, outcome))?
        ),
    }
    Ok(outcome)
}

pub(crate) fn describe<Q: OperationStore>(
    coordinator: &SyncCoordinator<Q>,
    outcome: DrainOutcome,
) -> String {
    let pending = coordinator.pending_count();
    match outcome {
        DrainOutcome::Completed(report) => format!(
            "Uploaded {} of {} operations ({} failed, {} pending)",
            report.succeeded, report.attempted, report.failed, pending
        ),
        DrainOutcome::Empty => "Nothing to sync".to_string(),
        DrainOutcome::Offline if coordinator.offline_mode() => {
            format!("Offline mode is on; {} operations pending", pending)
        }
        DrainOutcome::Offline => {
            format!("Upload service unreachable; {} operations pending", pending)
        }
        DrainOutcome::AlreadySyncing => "A sync is already running".to_string(),
    }
}

pub(crate) fn outcome_json<Q: OperationStore>(
    coordinator: &SyncCoordinator<Q>,
    outcome: DrainOutcome,
) -> serde_json::Value {
    let status = coordinator.status();
    let (name, report) = match outcome {
        DrainOutcome::Completed(report) => ("completed", Some(report)),
        DrainOutcome::Empty => ("empty", None),
        DrainOutcome::Offline => ("offline", None),
        DrainOutcome::AlreadySyncing => ("already_syncing", None),
    };
    json!({
        "outcome": name,
        "report": report,
        "pending_count": status.pending_count,
        "last_sync_completed_at": status.last_sync_completed_at,
        "offline_mode": status.offline_mode,
    })
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
