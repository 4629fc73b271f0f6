//! Schema migrations tracked with `PRAGMA user_version`.

pub mod v001_entity_tables;
pub mod v002_embedding_tables;

use rusqlite::Connection;

use wayfinder_core::errors::{StorageError, WayfinderResult};

type Migration = fn(&Connection) -> WayfinderResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_entity_tables::migrate),
    (2, v002_embedding_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations. Each one runs in its own transaction.
pub fn run_migrations(conn: &Connection) -> WayfinderResult<()> {
    let current = current_version(conn)?;

    for (version, migrate) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        let fail = |e: String| StorageError::MigrationFailed {
            version: *version,
            reason: e,
        };
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| fail(e.to_string()))?;
        let applied = migrate(conn).and_then(|()| {
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| fail(e.to_string()).into())
        });
        match applied {
            Ok(()) => {
                conn.execute_batch("COMMIT").map_err(|e| fail(e.to_string()))?;
                tracing::info!(version = version, "applied migration");
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(fail(e.to_string()).into());
            }
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> WayfinderResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| {
            StorageError::SqliteError {
                message: e.to_string(),
            }
            .into()
        })
}
