// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value settings persistence.
//!
//! The sync coordinator keeps two small values across restarts: when the
//! last drain pass completed and whether the user forced offline mode.
//! Both live in a flat string map so the backing store stays swappable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Settings key for the completion time of the last drain pass (RFC 3339).
pub const LAST_SYNC_DATE_KEY: &str = "last_sync_date";

/// Settings key for the user-forced offline switch ("true"/"false").
pub const OFFLINE_MODE_KEY: &str = "offline_mode";

/// Error type for settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// A flat string key-value store.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> SettingsResult<()>;

    fn remove(&self, key: &str) -> SettingsResult<()>;
}

/// Typed accessors over any [`SettingsStore`].
pub trait SettingsExt: SettingsStore {
    /// Read a timestamp, returning `None` if absent or unparsable.
    fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(key)?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "ignoring unparsable timestamp setting");
                None
            }
        }
    }

    fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> SettingsResult<()> {
        self.set(key, &value.to_rfc3339())
    }

    /// Read a boolean flag; anything other than `"true"` is false.
    fn get_flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.trim() == "true")
    }

    fn set_flag(&self, key: &str, value: bool) -> SettingsResult<()> {
        self.set(key, if value { "true" } else { "false" })
    }
}

impl<T: SettingsStore + ?Sized> SettingsExt for T {}

/// In-memory settings, for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SettingsResult<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Settings stored as a JSON object on disk.
///
/// Every read goes to the file so separate processes sharing a data
/// directory see each other's writes. Writes re-read the file, apply the
/// change and replace it through an fsynced temporary sibling.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSettings {
    pub fn open(path: &Path) -> Self {
        FileSettings {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; a missing or corrupt file reads as empty.
    fn load(&self) -> BTreeMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "settings file is corrupt, treating as empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read settings");
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> SettingsResult<()> {
        use std::io::Write;

        let json = serde_json::to_string_pretty(values)?;
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> SettingsResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = self.load();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
