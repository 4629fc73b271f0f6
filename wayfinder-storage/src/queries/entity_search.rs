//! Lexical lookup: case-insensitive substring match over text columns.

use rusqlite::{params, Connection};

use wayfinder_core::entity::{Entity, EntityClass};
use wayfinder_core::errors::WayfinderResult;

use super::entity_crud::parse_row;
use super::{columns_for, table_for, text_columns};
use crate::pool::functions::UNICODE_LOWER;
use crate::to_storage_err;

/// Entities of `class` whose text columns contain `text`, ascending id.
/// Blank text matches nothing.
pub fn find_by_text(
    conn: &Connection,
    class: EntityClass,
    text: &str,
    limit: usize,
) -> WayfinderResult<Vec<Entity>> {
    let needle = text.trim();
    if needle.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    // instr() avoids LIKE wildcard escaping for user text. Both sides fold
    // with Rust's Unicode lowercase so non-ASCII capitals still match.
    let predicate = text_columns(class)
        .iter()
        .map(|col| format!("instr({UNICODE_LOWER}({col}), ?1) > 0"))
        .collect::<Vec<_>>()
        .join(" OR ");
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY id LIMIT ?2",
        columns_for(class),
        table_for(class),
        predicate
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![needle.to_lowercase(), limit as i64], |row| {
            parse_row(class, row)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}
