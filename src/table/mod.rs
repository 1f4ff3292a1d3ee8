//! Table Module
//!
//! Per-table storage engine.
//!
//! ## Responsibilities
//! - Open or create a table file and hold an exclusive lock on it
//! - Materialize the whole file as an in-memory record array
//! - Apply select/insert/update/delete against that array
//! - Write the array back and unlock exactly once, on close or drop
//!
//! ## Locking
//! The lock is an advisory `fs2` lock on the open handle (`flock` on Unix,
//! `LockFileEx` on Windows). A second engine on the same file, in this
//! process or another, waits until the first one closes, or fails with
//! `TableError::Lock` when a bounded `LockWait::Timeout` runs out.
//!
//! ## Write-back
//! The file is never truncated on open. On close the serialized array is
//! written from offset 0 through the locked handle and the file length is
//! then cut to the new size.

mod engine;
mod lock;

pub use engine::TableEngine;
