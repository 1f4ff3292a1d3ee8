//! Table Engine
//!
//! One table file, one exclusive lock, one in-memory record array.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, TableError};
use crate::record::{self, decode_records, encode_records, Record};

use super::lock;

/// A single open table
///
/// ## Lifecycle
/// 1. Open (or create) the file read+write, never truncating it
/// 2. Take the exclusive lock on that handle
/// 3. Read and decode the whole file through the same handle
/// 4. All operations act on `records` only
/// 5. `close()` (or drop) rewrites the file from `records` and unlocks
///
/// Mutating methods take `&mut self`; share an engine between threads
/// behind a mutex.
#[derive(Debug)]
pub struct TableEngine {
    /// Path of the backing file
    path: PathBuf,

    /// Locked handle, `None` once persisted and released
    file: Option<File>,

    /// In-memory rows; the source of truth while open
    records: Vec<Record>,

    /// fsync after write-back
    sync_on_close: bool,
}

impl TableEngine {
    /// Open a table file with default settings (blocking lock, fsync on close)
    pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self> {
        Self::open_with(path, create_if_missing, &Config::default())
    }

    /// Open a table file using the lock and sync settings from `config`
    ///
    /// Fails with `NotFound` if the file is missing and `create_if_missing`
    /// is false, `AlreadyExists` if another creator won the race, `Lock` if
    /// the lock can't be taken, and `CorruptData` if the content is not a
    /// JSON array of objects.
    pub fn open_with(
        path: impl AsRef<Path>,
        create_if_missing: bool,
        config: &Config,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut file = Self::open_handle(path, create_if_missing)?;

        lock::lock_exclusive(&file, path, config.lock_wait)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes).map_err(|e| TableError::CorruptData {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let records = decode_records(path, &content)?;

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "table opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            records,
            sync_on_close: config.sync_on_close,
        })
    }

    /// Create an empty table file at `path`
    ///
    /// Not idempotent: an existing path fails with `AlreadyExists`.
    pub fn create_table(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Self::map_create_error(path, e))?;

        tracing::info!(path = %path.display(), "table created");
        Ok(())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Copy of every record, in table order
    pub fn select_all(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Records whose `key` field loosely equals `value`, in table order
    pub fn select(&self, key: &str, value: &Value) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| record::matches(r, key, value))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Write Operations (in-memory until close)
    // =========================================================================

    /// Append a record; duplicates are allowed
    pub fn insert(&mut self, record: Record) -> bool {
        self.records.push(record);
        true
    }

    /// Replace the first record whose `key` loosely equals `value`
    ///
    /// Returns whether a record was replaced. At most one row changes.
    pub fn update(&mut self, key: &str, value: &Value, new_record: Record) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| record::matches(r, key, value))
        {
            Some(slot) => {
                *slot = new_record;
                true
            }
            None => false,
        }
    }

    /// Replace the whole table, returning the new contents
    pub fn update_all(&mut self, records: Vec<Record>) -> Vec<Record> {
        self.records = records;
        self.records.clone()
    }

    /// Remove every record whose `key` loosely equals `value`
    ///
    /// Survivors keep their relative order. Returns the number removed.
    pub fn delete(&mut self, key: &str, value: &Value) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !record::matches(r, key, value));
        before - self.records.len()
    }

    /// Remove every record
    pub fn delete_all(&mut self) -> bool {
        self.records.clear();
        true
    }

    // =========================================================================
    // Close / Persistence
    // =========================================================================

    /// Write the records back to the file and release the lock
    ///
    /// Returns `Persist` if the write failed; the lock is released either way.
    pub fn close(mut self) -> Result<()> {
        self.persist_and_release()
    }

    fn persist_and_release(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        let written = self.write_back(&mut file);

        if let Err(e) = lock::unlock(&file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to unlock table");
        }
        drop(file);

        match &written {
            Ok(()) => tracing::debug!(
                path = %self.path.display(),
                records = self.records.len(),
                "table closed"
            ),
            Err(e) => tracing::error!(path = %self.path.display(), error = %e, "table write-back failed"),
        }
        written
    }

    /// Overwrite the file in place: write from offset 0, then cut the tail
    fn write_back(&self, file: &mut File) -> Result<()> {
        let bytes = encode_records(&self.records)?;
        let persist = |source| TableError::Persist {
            path: self.path.clone(),
            source,
        };

        file.seek(SeekFrom::Start(0)).map_err(persist)?;
        file.write_all(&bytes).map_err(persist)?;
        file.set_len(bytes.len() as u64).map_err(persist)?;
        file.flush().map_err(persist)?;
        if self.sync_on_close {
            file.sync_all().map_err(persist)?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the in-memory records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_handle(path: &Path, create_if_missing: bool) -> Result<File> {
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !create_if_missing {
                    return Err(TableError::NotFound(path.to_path_buf()));
                }
                Self::create_handle(path)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create the file for an engine; losing a creation race is `AlreadyExists`
    fn create_handle(path: &Path) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Self::map_create_error(path, e))?;
        tracing::info!(path = %path.display(), "table created");
        Ok(file)
    }

    fn map_create_error(path: &Path, e: std::io::Error) -> TableError {
        match e.kind() {
            ErrorKind::AlreadyExists => TableError::AlreadyExists(path.to_path_buf()),
            _ => TableError::Io(e),
        }
    }
}

impl Drop for TableEngine {
    fn drop(&mut self) {
        if self.file.is_some() {
            // Errors are already logged by persist_and_release
            let _ = self.persist_and_release();
        }
    }
}
