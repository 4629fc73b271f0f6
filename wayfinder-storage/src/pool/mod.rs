//! One serialized writer plus, for file-backed databases, a pool of readers.

pub mod functions;
pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use wayfinder_core::config::StorageConfig;
use wayfinder_core::errors::WayfinderResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` for in-memory databases: a second in-memory connection would be
    /// a different database, so reads go through the writer.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// The writer opens first so the file and its WAL exist before the
    /// read-only connections attach.
    pub fn open(path: &Path, config: &StorageConfig) -> WayfinderResult<Self> {
        let writer = WriteConnection::open(path, config.busy_timeout_ms)?;
        let readers = ReadPool::open(path, config)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> WayfinderResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: None,
            db_path: None,
        })
    }

    /// Run a read-only closure on a reader, or on the writer when there is
    /// no read pool.
    pub fn read<F, T>(&self, f: F) -> WayfinderResult<T>
    where
        F: FnOnce(&Connection) -> WayfinderResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.writer.with_conn(f),
        }
    }

    pub fn reader_count(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::size)
    }
}
