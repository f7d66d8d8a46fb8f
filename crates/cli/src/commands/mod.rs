// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod enqueue;
pub mod offline;
pub mod status;
pub mod sync;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{queue_path, settings_path, Config};
use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, FileSettings, HttpUploader, JsonlQueue, SyncCoordinator, Uploader,
};

/// Everything a command needs to find its data.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Load `config.toml` from `data_dir` (creating the directory) and apply
    /// environment overrides.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let config = Config::load(&data_dir)?.apply_env();
        Ok(Context { data_dir, config })
    }

    pub fn queue_path(&self) -> PathBuf {
        queue_path(&self.data_dir)
    }

    /// Open the durable queue; fails if another process holds it.
    pub fn open_queue(&self) -> Result<JsonlQueue> {
        Ok(JsonlQueue::open(&self.queue_path())?)
    }

    pub fn open_settings(&self) -> Arc<FileSettings> {
        Arc::new(FileSettings::open(&settings_path(&self.data_dir)))
    }

    /// Build the HTTP uploader from the validated `[upload]` section.
    pub fn uploader(&self) -> Result<Arc<dyn Uploader>> {
        self.config.upload.validate()?;
        let uploader = HttpUploader::new(&self.config.upload.uploader_config())?;
        Ok(Arc::new(uploader))
    }

    /// Assemble a coordinator over the durable queue and settings.
    pub fn open_coordinator(
        &self,
        monitor: ConnectivityMonitor,
    ) -> Result<SyncCoordinator<JsonlQueue>> {
        let uploader = self.uploader()?;
        let queue = self.open_queue()?;
        Ok(SyncCoordinator::new(
            queue,
            monitor,
            uploader,
            self.open_settings(),
        ))
    }
}

/// Runtime for commands that talk to the network.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
