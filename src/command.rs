//! Command definitions
//!
//! Typed operations forwarded by the registry to a table engine, and their
//! results. The table name is resolved by the registry and never travels
//! inside a command.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Select,
    SelectAll,
    Update,
    UpdateAll,
    Insert,
    Delete,
    DeleteAll,
    CreateTable,
}

/// A table operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Records whose `key` loosely equals `value`
    Select { key: String, value: Value },

    /// Every record
    SelectAll,

    /// Replace the first matching record
    Update {
        key: String,
        value: Value,
        record: Record,
    },

    /// Replace the whole table
    UpdateAll { records: Vec<Record> },

    /// Append a record
    Insert { record: Record },

    /// Remove all matching records
    Delete { key: String, value: Value },

    /// Remove every record
    DeleteAll,

    /// Create an empty table file
    CreateTable,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Select { .. } => CommandType::Select,
            Command::SelectAll => CommandType::SelectAll,
            Command::Update { .. } => CommandType::Update,
            Command::UpdateAll { .. } => CommandType::UpdateAll,
            Command::Insert { .. } => CommandType::Insert,
            Command::Delete { .. } => CommandType::Delete,
            Command::DeleteAll => CommandType::DeleteAll,
            Command::CreateTable => CommandType::CreateTable,
        }
    }

    /// Whether the command changes table contents
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self.command_type(),
            CommandType::Select | CommandType::SelectAll
        )
    }
}

/// Result of a table operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// select / select_all / update_all
    Records(Vec<Record>),

    /// update: whether a record matched; insert / delete_all / create_table: success
    Done(bool),

    /// delete: number of records removed
    Deleted(usize),
}

impl Response {
    /// Records payload, if any
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Response::Records(records) => Some(records),
            _ => None,
        }
    }
}
