//! # jsontable
//!
//! A minimal file-backed record store:
//! - One JSON file per table, holding an array of schemaless records
//! - Exclusive advisory file lock held for the lifetime of an open table
//! - Whole-file read on open, whole-file write-back on close
//! - Loose value matching for select/update/delete
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Host / CLI                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  (table name, Command)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Table Registry                             │
//! │       (name → path, one cached engine per path)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ TableEngine │   ...    │ TableEngine │
//!   │ (lock + Vec)│          │ (lock + Vec)│
//!   └──────┬──────┘          └──────┬──────┘
//!          ▼                         ▼
//!     people.json               orders.json
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod table;
pub mod command;
pub mod registry;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TableError, Result};
pub use config::{Config, LockWait};
pub use record::Record;
pub use table::TableEngine;
pub use command::{Command, Response};
pub use registry::{TableHandle, TableRegistry};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsontable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
