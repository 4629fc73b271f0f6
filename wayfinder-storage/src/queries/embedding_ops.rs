//! Embedding store queries: upsert, keyset-paged scan, delete, count.

use rusqlite::{params, Connection};

use wayfinder_core::entity::{EntityClass, EntityId};
use wayfinder_core::errors::{StorageError, WayfinderResult};

use crate::to_storage_err;

/// Upsert one vector. Callers validate length and finiteness first.
pub fn put_embedding(
    conn: &Connection,
    class: EntityClass,
    id: EntityId,
    vector: &[f32],
) -> WayfinderResult<()> {
    conn.execute(
        "INSERT INTO entity_embeddings (entity_class, entity_id, embedding, dimensions)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(entity_class, entity_id) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![class.as_str(), id.get(), f32_vec_to_bytes(vector), vector.len() as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// One decoded scan row; decoding fails per row, never per page.
pub type ScannedRow = (EntityId, WayfinderResult<Vec<f32>>);

/// One page of a keyset scan: rows with `entity_id > after`, ascending.
/// A blob whose length disagrees with its `dimensions` column decodes to a
/// `CorruptEmbedding` error in place, so the cursor still advances past it.
pub fn scan_page(
    conn: &Connection,
    class: EntityClass,
    after: Option<EntityId>,
    page_size: usize,
) -> WayfinderResult<Vec<ScannedRow>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, embedding, dimensions FROM entity_embeddings
             WHERE entity_class = ?1 AND entity_id > ?2
             ORDER BY entity_id
             LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![
                class.as_str(),
                after.map(EntityId::get).unwrap_or(i64::MIN),
                page_size as i64
            ],
            |row| {
                let id: i64 = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                let dims: i64 = row.get(2)?;
                Ok((id, blob, dims))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut page = Vec::new();
    for row in rows {
        let (id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let entity_id = EntityId(id);
        let decoded = bytes_to_f32_vec(&blob, dims as usize).ok_or_else(|| {
            StorageError::CorruptEmbedding {
                entity: format!("{class} {entity_id}"),
                details: format!("{} bytes for {dims} dimensions", blob.len()),
            }
            .into()
        });
        page.push((entity_id, decoded));
    }
    Ok(page)
}

pub fn get_embedding(
    conn: &Connection,
    class: EntityClass,
    id: EntityId,
) -> WayfinderResult<Option<Vec<f32>>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT embedding, dimensions FROM entity_embeddings
             WHERE entity_class = ?1 AND entity_id = ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut rows = stmt
        .query(params![class.as_str(), id.get()])
        .map_err(|e| to_storage_err(e.to_string()))?;
    match rows.next().map_err(|e| to_storage_err(e.to_string()))? {
        Some(row) => {
            let blob: Vec<u8> = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
            let dims: i64 = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
            bytes_to_f32_vec(&blob, dims as usize).map(Some).ok_or_else(|| {
                StorageError::CorruptEmbedding {
                    entity: format!("{class} {id}"),
                    details: format!("{} bytes for {dims} dimensions", blob.len()),
                }
                .into()
            })
        }
        None => Ok(None),
    }
}

pub fn delete_embedding(
    conn: &Connection,
    class: EntityClass,
    id: EntityId,
) -> WayfinderResult<bool> {
    let removed = conn
        .execute(
            "DELETE FROM entity_embeddings WHERE entity_class = ?1 AND entity_id = ?2",
            params![class.as_str(), id.get()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

pub fn count_embeddings(conn: &Connection, class: EntityClass) -> WayfinderResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM entity_embeddings WHERE entity_class = ?1",
            params![class.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Convert f32 slice to bytes (little-endian).
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to an f32 vec. `None` when the byte length does not
/// match `expected_dims`.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Option<Vec<f32>> {
    if bytes.len() != expected_dims * 4 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}
