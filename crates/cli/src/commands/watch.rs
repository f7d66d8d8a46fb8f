// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, ReachabilityProbe, SettingsExt, SyncStatus, OFFLINE_MODE_KEY,
};

use super::{runtime, Context};

/// How often the offline-mode setting is re-read from disk.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Run the probe and drain worker until Ctrl-C.
pub fn run(ctx: &Context) -> Result<()> {
    runtime()?.block_on(run_until(ctx, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
        }
    }))
}

/// Watch until `stop` resolves.
pub(crate) async fn run_until(ctx: &Context, stop: impl Future<Output = ()>) -> Result<()> {
    let monitor = ConnectivityMonitor::new();
    let probe = ReachabilityProbe::new(ctx.config.probe_config()?, monitor.clone());
    let coordinator = Arc::new(ctx.open_coordinator(monitor)?);

    // Settle connectivity before the worker's startup pass.
    probe.probe_once().await;
    let cancel = CancellationToken::new();
    let probe_handle = probe.spawn(cancel.clone());
    let worker = coordinator.spawn_with(ctx.config.sync.backoff());

    let settings = ctx.open_settings();
    let mut status = coordinator.subscribe();
    let mut settings_poll = tokio::time::interval(SETTINGS_POLL_INTERVAL);
    println!("Watching {} (Ctrl-C to stop)", ctx.config.upload.endpoint);
    println!("{}", status_line(&coordinator.status()));

    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                println!("{}", status_line(&current));
            }
            _ = settings_poll.tick() => {
                let offline = settings.get_flag(OFFLINE_MODE_KEY);
                if offline != coordinator.offline_mode() {
                    coordinator.set_offline_mode(offline);
                }
            }
        }
    }

    cancel.cancel();
    if let Err(e) = probe_handle.await {
        tracing::warn!(error = %e, "probe task failed");
    }
    worker.shutdown().await;
    Ok(())
}

pub(crate) fn status_line(status: &SyncStatus) -> String {
    let network = if status.offline_mode {
        "offline mode".to_string()
    } else if status.is_connected {
        format!("online ({})", status.connection_type)
    } else {
        "offline".to_string()
    };
    let last = status
        .last_sync_completed_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "[{}] pending={} {}last sync {}",
        network,
        status.pending_count,
        if status.is_syncing { "syncing, " } else { "" },
        last
    )
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
