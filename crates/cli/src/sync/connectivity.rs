// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability tracking.
//!
//! [`ConnectivityMonitor`] holds the latest known connectivity state and
//! fans it out over a `watch` channel. Consumers that only care about the
//! online/offline edge use [`ConnectivityEvents`], which filters out updates
//! that change nothing but the interface type.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// Interface the current network path runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Wifi,
    Cellular,
    Ethernet,
    #[default]
    Unknown,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Cellular => "cellular",
            ConnectionType::Ethernet => "ethernet",
            ConnectionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latest known connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectivityStatus {
    pub is_connected: bool,
    pub connection_type: ConnectionType,
}

impl ConnectivityStatus {
    pub fn online(connection_type: ConnectionType) -> Self {
        ConnectivityStatus {
            is_connected: true,
            connection_type,
        }
    }

    pub fn offline() -> Self {
        ConnectivityStatus {
            is_connected: false,
            connection_type: ConnectionType::Unknown,
        }
    }
}

impl Default for ConnectivityStatus {
    /// Connected until the first observation says otherwise, so the very
    /// first launch is never held back waiting for a path update.
    fn default() -> Self {
        ConnectivityStatus::online(ConnectionType::Unknown)
    }
}

/// A single observation of the underlying network path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathUpdate {
    /// Whether the path can currently carry traffic.
    pub satisfied: bool,
    /// Interfaces the path uses.
    pub interfaces: Vec<ConnectionType>,
}

impl PathUpdate {
    pub fn satisfied(interfaces: impl Into<Vec<ConnectionType>>) -> Self {
        PathUpdate {
            satisfied: true,
            interfaces: interfaces.into(),
        }
    }

    pub fn unsatisfied() -> Self {
        PathUpdate::default()
    }

    /// Picks the reported connection type; wifi wins over cellular, cellular
    /// over ethernet.
    pub fn connection_type(&self) -> ConnectionType {
        [
            ConnectionType::Wifi,
            ConnectionType::Cellular,
            ConnectionType::Ethernet,
        ]
        .into_iter()
        .find(|t| self.interfaces.contains(t))
        .unwrap_or(ConnectionType::Unknown)
    }
}

/// An online/offline transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityChange {
    pub was_connected: bool,
    pub status: ConnectivityStatus,
}

impl ConnectivityChange {
    /// The false→true edge that should trigger a queue drain.
    pub fn came_online(&self) -> bool {
        !self.was_connected && self.status.is_connected
    }

    pub fn went_offline(&self) -> bool {
        self.was_connected && !self.status.is_connected
    }
}

/// Shared handle to the current connectivity state.
///
/// Cloning is cheap; all clones observe and update the same state.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<ConnectivityStatus>>,
}

impl ConnectivityMonitor {
    /// Create a monitor in the default (connected, unknown interface) state.
    pub fn new() -> Self {
        Self::with_status(ConnectivityStatus::default())
    }

    pub fn with_status(status: ConnectivityStatus) -> Self {
        let (tx, _rx) = watch::channel(status);
        ConnectivityMonitor { tx: Arc::new(tx) }
    }

    /// Non-blocking read of the latest known state.
    pub fn current_status(&self) -> ConnectivityStatus {
        *self.tx.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.current_status().is_connected
    }

    /// Record a path observation. Both fields are recomputed on every update.
    ///
    /// Returns the transition if `is_connected` flipped.
    pub fn apply(&self, update: &PathUpdate) -> Option<ConnectivityChange> {
        let status = ConnectivityStatus {
            is_connected: update.satisfied,
            connection_type: if update.satisfied {
                update.connection_type()
            } else {
                ConnectionType::Unknown
            },
        };
        self.set_status(status)
    }

    /// Overwrite the state directly.
    pub fn set_status(&self, status: ConnectivityStatus) -> Option<ConnectivityChange> {
        let previous = self.tx.send_replace(status);
        if previous.is_connected == status.is_connected {
            return None;
        }

        tracing::debug!(
            connected = status.is_connected,
            connection_type = %status.connection_type,
            "connectivity changed"
        );
        Some(ConnectivityChange {
            was_connected: previous.is_connected,
            status,
        })
    }

    /// Shorthand for tests and manual overrides.
    pub fn set_connected(&self, connected: bool) -> Option<ConnectivityChange> {
        let status = if connected {
            ConnectivityStatus::online(self.current_status().connection_type)
        } else {
            ConnectivityStatus::offline()
        };
        self.set_status(status)
    }

    /// Subscribe to online/offline transitions from this point on.
    pub fn subscribe(&self) -> ConnectivityEvents {
        let rx = self.tx.subscribe();
        let last_connected = rx.borrow().is_connected;
        ConnectivityEvents { rx, last_connected }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream of online/offline transitions.
///
/// Updates that arrive faster than they are consumed are coalesced; the
/// consumer sees the latest state and an edge only if it differs from the
/// last state it was told about.
pub struct ConnectivityEvents {
    rx: watch::Receiver<ConnectivityStatus>,
    last_connected: bool,
}

impl ConnectivityEvents {
    /// Wait for the next transition. Returns `None` once every monitor handle
    /// has been dropped.
    pub async fn next(&mut self) -> Option<ConnectivityChange> {
        loop {
            self.rx.changed().await.ok()?;
            let status = *self.rx.borrow_and_update();
            if status.is_connected != self.last_connected {
                let change = ConnectivityChange {
                    was_connected: self.last_connected,
                    status,
                };
                self.last_connected = status.is_connected;
                return Some(change);
            }
        }
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
