//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use wayfinder_core::errors::WayfinderResult;

use super::functions::register_functions;
use crate::to_storage_err;

/// Pragmas for the write connection: WAL, NORMAL sync, foreign keys.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> WayfinderResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    register_functions(conn)
}

/// Pragmas for read connections. Journal mode is a property of the file,
/// so readers only set what is per-connection.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u32) -> WayfinderResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA query_only = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    register_functions(conn)
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> WayfinderResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
