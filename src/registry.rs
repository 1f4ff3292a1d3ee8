//! Table Registry
//!
//! Maps logical table names to table engines and forwards operations.
//!
//! ## Responsibilities
//! - Resolve `name` → `{data_dir}/{name}{extension}`
//! - Keep exactly one live engine per resolved path for the session
//! - Forward typed commands to the engine under its mutex
//! - Close engines (write-back + unlock) on request or when dropped

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::command::{Command, Response};
use crate::config::Config;
use crate::error::{Result, TableError};
use crate::record::Record;
use crate::table::TableEngine;

/// Shared handle to a cached engine
pub type TableHandle = Arc<Mutex<TableEngine>>;

/// Registry of open tables in one data directory
///
/// ## Concurrency:
/// - `tables`: map guarded by a mutex, held while an engine is being opened
///   so the same path is never opened twice
/// - each engine sits behind its own mutex; callers are serialized per table
pub struct TableRegistry {
    /// Registry configuration (directory, extension, engine settings)
    config: Config,

    /// Live engines keyed by resolved file path
    tables: Mutex<HashMap<PathBuf, TableHandle>>,
}

impl TableRegistry {
    /// Open a registry over an existing data directory
    pub fn open(config: Config) -> Result<Self> {
        if !config.data_dir.is_dir() {
            return Err(TableError::Config(format!(
                "data directory not found: {}",
                config.data_dir.display()
            )));
        }

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            extension = %config.extension,
            "registry opened"
        );

        Ok(Self {
            config,
            tables: Mutex::new(HashMap::new()),
        })
    }

    /// Open a registry over `path` with default table settings
    ///
    /// The directory must already exist; tables are `.json` files in it.
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.data_dir = path.to_path_buf();
        Self::open(config)
    }

    /// Map a table name to its file path
    pub fn resolve_table(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(&['/', '\\', '\0'][..])
        {
            return Err(TableError::InvalidTableName(name.to_string()));
        }
        Ok(self
            .config
            .data_dir
            .join(format!("{}{}", name, self.config.extension)))
    }

    /// Return the cached engine for `path`, opening it on first use
    pub fn get_or_open(&self, path: &Path, create_if_missing: bool) -> Result<TableHandle> {
        let mut tables = self.tables.lock();

        if let Some(handle) = tables.get(path) {
            return Ok(Arc::clone(handle));
        }

        let engine = TableEngine::open_with(path, create_if_missing, &self.config)?;
        let handle = Arc::new(Mutex::new(engine));
        tables.insert(path.to_path_buf(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Cached engine for a table name
    pub fn table(&self, name: &str) -> Result<TableHandle> {
        let path = self.resolve_table(name)?;
        self.get_or_open(&path, self.config.create_if_missing)
    }

    /// Execute a command against a table
    pub fn execute(&self, name: &str, command: Command) -> Result<Response> {
        tracing::debug!(
            table = name,
            op = ?command.command_type(),
            mutation = command.is_mutation(),
            "execute"
        );

        match command {
            Command::CreateTable => {
                self.create_table(name)?;
                Ok(Response::Done(true))
            }
            Command::Select { key, value } => {
                self.select(name, &key, &value).map(Response::Records)
            }
            Command::SelectAll => self.select_all(name).map(Response::Records),
            Command::Update { key, value, record } => {
                self.update(name, &key, &value, record).map(Response::Done)
            }
            Command::UpdateAll { records } => {
                self.update_all(name, records).map(Response::Records)
            }
            Command::Insert { record } => self.insert(name, record).map(Response::Done),
            Command::Delete { key, value } => {
                self.delete(name, &key, &value).map(Response::Deleted)
            }
            Command::DeleteAll => self.delete_all(name).map(Response::Done),
        }
    }

    // =========================================================================
    // Per-operation API
    // =========================================================================

    pub fn select(&self, name: &str, key: &str, value: &Value) -> Result<Vec<Record>> {
        self.with_table(name, |engine| engine.select(key, value))
    }

    pub fn select_all(&self, name: &str) -> Result<Vec<Record>> {
        self.with_table(name, |engine| engine.select_all())
    }

    pub fn insert(&self, name: &str, record: Record) -> Result<bool> {
        self.with_table(name, |engine| engine.insert(record))
    }

    pub fn update(&self, name: &str, key: &str, value: &Value, record: Record) -> Result<bool> {
        self.with_table(name, |engine| engine.update(key, value, record))
    }

    pub fn update_all(&self, name: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        self.with_table(name, |engine| engine.update_all(records))
    }

    pub fn delete(&self, name: &str, key: &str, value: &Value) -> Result<usize> {
        self.with_table(name, |engine| engine.delete(key, value))
    }

    pub fn delete_all(&self, name: &str) -> Result<bool> {
        self.with_table(name, |engine| engine.delete_all())
    }

    /// Create an empty table file; fails with `AlreadyExists` if present
    pub fn create_table(&self, name: &str) -> Result<()> {
        let path = self.resolve_table(name)?;
        TableEngine::create_table(&path)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close one table, persisting its records
    ///
    /// Fails with `Lock` while a caller still holds a `TableHandle` for it;
    /// the engine then stays cached and open.
    pub fn close_table(&self, name: &str) -> Result<()> {
        let path = self.resolve_table(name)?;
        let mut tables = self.tables.lock();

        let Some(handle) = tables.remove(&path) else {
            return Ok(());
        };

        match Arc::try_unwrap(handle) {
            Ok(engine) => {
                drop(tables);
                engine.into_inner().close()
            }
            Err(shared) => {
                tables.insert(path.clone(), shared);
                Err(Self::in_use(&path))
            }
        }
    }

    /// Close every open table
    ///
    /// Every table is attempted; the first error is returned. A table whose
    /// handle is still held elsewhere reports `Lock` and is written back
    /// when that last handle drops.
    pub fn close(self) -> Result<()> {
        let tables: Vec<(PathBuf, TableHandle)> = self.tables.lock().drain().collect();

        let mut first_error = None;
        for (path, handle) in tables {
            if let Err(e) = Self::close_handle(&path, handle) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Paths of the tables currently open
    pub fn open_tables(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.tables.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn with_table<T>(&self, name: &str, f: impl FnOnce(&mut TableEngine) -> T) -> Result<T> {
        let handle = self.table(name)?;
        let mut engine = handle.lock();
        Ok(f(&mut engine))
    }

    fn close_handle(path: &Path, handle: TableHandle) -> Result<()> {
        match Arc::try_unwrap(handle) {
            Ok(engine) => engine.into_inner().close(),
            Err(_shared) => {
                tracing::warn!(
                    path = %path.display(),
                    "table still referenced, write-back deferred to last handle"
                );
                Err(Self::in_use(path))
            }
        }
    }

    fn in_use(path: &Path) -> TableError {
        TableError::Lock(format!("{}: table still in use", path.display()))
    }
}
