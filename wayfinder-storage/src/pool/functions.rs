//! Scalar functions registered on every connection.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use wayfinder_core::errors::WayfinderResult;

use crate::to_storage_err;

/// Unicode-aware lowercase. SQLite's built-in `lower()` only folds ASCII.
pub const UNICODE_LOWER: &str = "unicode_lower";

pub fn register_functions(conn: &Connection) -> WayfinderResult<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|s| s.to_lowercase()))
        },
    )
    .map_err(|e| to_storage_err(format!("register {UNICODE_LOWER}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_non_ascii_and_passes_null_through() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        let lowered: String = conn
            .query_row("SELECT unicode_lower('École ÅNGSTRÖM')", [], |r| r.get(0))
            .unwrap();
        assert_eq!(lowered, "école ångström");
        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL)", [], |r| r.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
