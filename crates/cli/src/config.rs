// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sidekick configuration management.
//!
//! Everything sidekick keeps on disk lives in one data directory:
//! - `config.toml`: upload endpoint, connectivity probe and retry settings
//! - `queue.jsonl`: pending operations
//! - `settings.json`: last sync time and the offline-mode switch

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::{BackoffConfig, HttpUploaderConfig, ProbeConfig};

const DATA_DIR_NAME: &str = "sidekick";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "queue.jsonl";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:7890/v1";

/// Configuration stored in `<data-dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Where and how operations are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Base URL; each operation kind is posted to a route below it.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token sent with every upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            endpoint: default_endpoint(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UploadConfig {
    /// Checks that the endpoint is an http(s) URL and the timeout is usable.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };
        let url = Url::parse(self.endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "upload.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn uploader_config(&self) -> HttpUploaderConfig {
        HttpUploaderConfig {
            endpoint: self.endpoint.clone(),
            auth_token: self.auth_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Reachability probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// `host:port` to probe. Derived from the upload endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_addr: Option<String>,
    /// Time between probes in milliseconds (default: 5000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Max time to wait for a probe connection in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe_addr: None,
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

/// Retry pacing for the background worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// First backoff delay after a pass where every upload failed, in
    /// milliseconds (default: 1000).
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
    /// Upper bound for the backoff delay in seconds (default: 60).
    #[serde(default = "default_retry_max_delay_secs")]
    pub retry_max_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_secs: default_retry_max_delay_secs(),
        }
    }
}

impl SyncConfig {
    pub fn backoff(&self) -> BackoffConfig {
        let initial = Duration::from_millis(self.retry_initial_delay_ms);
        BackoffConfig {
            initial,
            max: Duration::from_secs(self.retry_max_delay_secs).max(initial),
        }
    }
}

fn default_retry_initial_delay_ms() -> u64 {
    1_000
}

fn default_retry_max_delay_secs() -> u64 {
    60
}

impl Config {
    /// Loads configuration from the given data directory.
    ///
    /// A missing file yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = config_path(data_dir);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Applies `SIDEKICK_UPLOAD_ENDPOINT` and `SIDEKICK_AUTH_TOKEN`.
    pub fn apply_env(self) -> Self {
        self.with_overrides(env::upload_endpoint(), env::auth_token())
    }

    pub fn with_overrides(mut self, endpoint: Option<String>, auth_token: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.upload.endpoint = endpoint;
        }
        if auth_token.is_some() {
            self.upload.auth_token = auth_token;
        }
        self
    }

    /// Probe settings, deriving the address from the endpoint if needed.
    pub fn probe_config(&self) -> Result<ProbeConfig> {
        let addr = match &self.connectivity.probe_addr {
            Some(addr) => addr.clone(),
            None => probe_addr_for(&self.upload.endpoint)?,
        };
        if self.connectivity.probe_interval_ms == 0 {
            return Err(Error::Config(
                "connectivity.probe_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.connectivity.probe_timeout_ms == 0 {
            return Err(Error::Config(
                "connectivity.probe_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(ProbeConfig {
            addr,
            interval: Duration::from_millis(self.connectivity.probe_interval_ms),
            timeout: Duration::from_millis(self.connectivity.probe_timeout_ms),
        })
    }
}

/// `host:port` of an http(s) endpoint, using the scheme's default port.
pub fn probe_addr_for(endpoint: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(&e.to_string()))?;
    let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("no port for scheme"))?;
    Ok(format!("{}:{}", host, port))
}

/// Resolve the data directory: explicit flag, then `SIDEKICK_DATA_DIR`,
/// then the platform's local data directory.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env::data_dir() {
        return Ok(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join(DATA_DIR_NAME))
        .ok_or(Error::NoDataDir)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

pub fn queue_path(data_dir: &Path) -> PathBuf {
    data_dir.join(QUEUE_FILE_NAME)
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
