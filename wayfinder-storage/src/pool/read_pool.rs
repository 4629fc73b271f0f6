//! Read-only connections to a file-backed database. Under WAL they never
//! wait on the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, TryLockError};

use rusqlite::{Connection, OpenFlags};

use wayfinder_core::config::StorageConfig;
use wayfinder_core::errors::WayfinderResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const MAX_READERS: usize = 8;

pub struct ReadPool {
    slots: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Attach `config.read_pool_size` readers (clamped to 1..=8) to `path`.
    /// The file must already exist; the writer creates it.
    pub fn open(path: &Path, config: &StorageConfig) -> WayfinderResult<Self> {
        let size = config.read_pool_size.clamp(1, MAX_READERS);
        let slots = (0..size)
            .map(|_| {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(|e| to_storage_err(format!("open reader: {e}")))?;
                apply_read_pragmas(&conn, config.busy_timeout_ms)?;
                Ok(Mutex::new(conn))
            })
            .collect::<WayfinderResult<Vec<_>>>()?;
        Ok(Self {
            slots,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on an idle reader if one is free, otherwise wait on the next
    /// one in rotation.
    pub fn with_conn<F, T>(&self, f: F) -> WayfinderResult<T>
    where
        F: FnOnce(&Connection) -> WayfinderResult<T>,
    {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        let n = self.slots.len();
        for offset in 0..n {
            match self.slots[(start + offset) % n].try_lock() {
                Ok(guard) => return f(&guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(poisoned)) => return f(&poisoned.into_inner()),
            }
        }
        let guard = self.slots[start % n]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }
}
