//! File locking
//!
//! Exclusive advisory lock on an open table handle.

use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Instant;

use fs2::FileExt;

use crate::config::LockWait;
use crate::error::{Result, TableError};

/// Acquire an exclusive lock on `file` according to `wait`
///
/// The lock belongs to the open handle: it is released by `unlock` or when
/// the handle is closed.
pub fn lock_exclusive(file: &File, path: &Path, wait: LockWait) -> Result<()> {
    match wait {
        LockWait::Blocking => file
            .lock_exclusive()
            .map_err(|e| TableError::Lock(format!("{}: {}", path.display(), e))),

        LockWait::Timeout {
            timeout,
            poll_interval,
        } => {
            let started = Instant::now();
            loop {
                match file.try_lock_exclusive() {
                    Ok(()) => return Ok(()),
                    Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                        if started.elapsed() >= timeout {
                            return Err(TableError::Lock(format!(
                                "{}: timed out after {:?}",
                                path.display(),
                                timeout
                            )));
                        }
                        tracing::trace!(path = %path.display(), "table lock busy, retrying");
                        thread::sleep(poll_interval);
                    }
                    Err(e) => {
                        return Err(TableError::Lock(format!("{}: {}", path.display(), e)));
                    }
                }
            }
        }
    }
}

/// Release the lock held by `file`
pub fn unlock(file: &File) -> std::io::Result<()> {
    // Fully qualified: newer toolchains give `File` an inherent `unlock`
    FileExt::unlock(file)
}
