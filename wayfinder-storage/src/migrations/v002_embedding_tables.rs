//! v002: entity_embeddings, one little-endian f32 blob per (class, entity).
//!
//! The table is keyed by class tag rather than a foreign key so both entity
//! tables share it; entity deletion removes the row in the same transaction.

use rusqlite::Connection;

use wayfinder_core::errors::WayfinderResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WayfinderResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entity_embeddings (
            entity_class  TEXT NOT NULL CHECK (entity_class IN ('organization', 'program')),
            entity_id     INTEGER NOT NULL,
            embedding     BLOB NOT NULL,
            dimensions    INTEGER NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (entity_class, entity_id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
