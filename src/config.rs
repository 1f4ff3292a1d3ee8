//! Configuration for jsontable
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a table registry
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one file per table
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── people.json
    ///     └── orders.json
    pub data_dir: PathBuf,

    /// Extension appended to a table name to form its file name
    pub extension: String,

    /// Create missing table files on first access instead of failing
    pub create_if_missing: bool,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// How long to wait for the exclusive file lock
    pub lock_wait: LockWait,

    /// fsync the table file after write-back on close
    pub sync_on_close: bool,
}

/// Lock acquisition strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockWait {
    /// Block the calling thread until the lock is granted
    Blocking,

    /// Poll for the lock, giving up after `timeout`
    Timeout {
        timeout: Duration,
        poll_interval: Duration,
    },
}

impl LockWait {
    /// Bounded wait with a 10ms poll interval
    pub fn timeout(timeout: Duration) -> Self {
        LockWait::Timeout {
            timeout,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./"),
            extension: ".json".to_string(),
            create_if_missing: false,
            lock_wait: LockWait::Blocking,
            sync_on_close: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (one file per table)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the table file extension (e.g. ".json", ".db")
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.config.extension = ext.into();
        self
    }

    /// Create missing tables when they are first opened
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Set the lock acquisition strategy
    pub fn lock_wait(mut self, wait: LockWait) -> Self {
        self.config.lock_wait = wait;
        self
    }

    /// Enable or disable fsync after write-back
    pub fn sync_on_close(mut self, sync: bool) -> Self {
        self.config.sync_on_close = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
