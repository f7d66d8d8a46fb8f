// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability probing.
//!
//! Desktop and CI hosts have no OS path monitor we can subscribe to, so the
//! CLI derives the network-path signal from a periodic TCP connect to the
//! upload host and feeds the result into the [`ConnectivityMonitor`].

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::connectivity::{ConnectivityMonitor, ConnectivityStatus, PathUpdate};

/// Configuration for the reachability probe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// `host:port` to connect to.
    pub addr: String,
    /// Time between probes.
    pub interval: Duration,
    /// Max time to wait for a single connect.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            addr: "localhost:7890".to_string(),
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Periodically checks whether the upload host is reachable.
pub struct ReachabilityProbe {
    config: ProbeConfig,
    monitor: ConnectivityMonitor,
}

impl ReachabilityProbe {
    pub fn new(config: ProbeConfig, monitor: ConnectivityMonitor) -> Self {
        ReachabilityProbe { config, monitor }
    }

    /// Attempt one connection and describe the result as a path update.
    pub async fn check(&self) -> PathUpdate {
        let connect = TcpStream::connect(self.config.addr.as_str());
        match tokio::time::timeout(self.config.timeout, connect).await {
            Ok(Ok(_stream)) => PathUpdate::satisfied(Vec::new()),
            Ok(Err(e)) => {
                tracing::debug!(addr = %self.config.addr, error = %e, "probe connect failed");
                PathUpdate::unsatisfied()
            }
            Err(_) => {
                tracing::debug!(addr = %self.config.addr, "probe connect timed out");
                PathUpdate::unsatisfied()
            }
        }
    }

    /// Probe once and publish the result to the monitor.
    pub async fn probe_once(&self) -> ConnectivityStatus {
        let update = self.check().await;
        self.monitor.apply(&update);
        self.monitor.current_status()
    }

    /// Probe on an interval until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = interval.tick() => {}
                }

                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = self.probe_once() => {}
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
