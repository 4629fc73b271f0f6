//! Organization and program CRUD keyed by natural key.

use rusqlite::{params, Connection, OptionalExtension, Row};

use wayfinder_core::entity::{Entity, EntityClass, EntityId, EntityRecord, Organization, Program};
use wayfinder_core::errors::{WayfinderError, WayfinderResult};

use super::{columns_for, table_for};
use crate::to_storage_err;

/// Parse a row selected with `ORGANIZATION_COLUMNS`.
pub(crate) fn parse_organization_row(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: EntityId(row.get(0)?),
        record: EntityRecord::Organization(Organization {
            name: row.get(1)?,
            country: row.get(2)?,
            city: row.get(3)?,
            website: row.get(4)?,
            description: row.get(5)?,
            undergraduate_programs: row.get(6)?,
            graduate_programs: row.get(7)?,
            tuition_undergrad: row.get(8)?,
            tuition_grad: row.get(9)?,
            living_cost: row.get(10)?,
            application_deadlines: row.get(11)?,
            admission_requirements: row.get(12)?,
            scholarships: row.get(13)?,
            campus_facilities: row.get(14)?,
        }),
    })
}

/// Parse a row selected with `PROGRAM_COLUMNS`.
pub(crate) fn parse_program_row(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: EntityId(row.get(0)?),
        record: EntityRecord::Program(Program {
            organization_id: EntityId(row.get(1)?),
            name: row.get(2)?,
            description: row.get(3)?,
            degree_type: row.get(4)?,
            field_of_study: row.get(5)?,
            duration: row.get(6)?,
            tuition_fee: row.get(7)?,
            application_deadline: row.get(8)?,
            admission_requirements: row.get(9)?,
            scholarships: row.get(10)?,
            language_of_study: row.get(11)?,
            starting_date: row.get(12)?,
        }),
    })
}

pub(crate) fn parse_row(class: EntityClass, row: &Row<'_>) -> rusqlite::Result<Entity> {
    match class {
        EntityClass::Organization => parse_organization_row(row),
        EntityClass::Program => parse_program_row(row),
    }
}

pub fn get_entity(
    conn: &Connection,
    class: EntityClass,
    id: EntityId,
) -> WayfinderResult<Option<Entity>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        columns_for(class),
        table_for(class)
    );
    conn.query_row(&sql, params![id.get()], |row| parse_row(class, row))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert or update by natural key. Updating an existing row drops its stored
/// embedding so the entity is picked up again for re-embedding.
/// Wrapped in a SAVEPOINT: lookup + write + embedding reset are all-or-nothing.
pub fn upsert_entity(conn: &Connection, record: &EntityRecord) -> WayfinderResult<EntityId> {
    record.validate()?;

    conn.execute_batch("SAVEPOINT upsert_entity")
        .map_err(|e| to_storage_err(format!("upsert savepoint: {e}")))?;

    let result = match record {
        EntityRecord::Organization(org) => upsert_organization_inner(conn, org),
        EntityRecord::Program(program) => upsert_program_inner(conn, program),
    };

    match result {
        Ok(id) => {
            conn.execute_batch("RELEASE upsert_entity")
                .map_err(|e| to_storage_err(format!("upsert release: {e}")))?;
            Ok(id)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO upsert_entity");
            let _ = conn.execute_batch("RELEASE upsert_entity");
            Err(e)
        }
    }
}

fn upsert_organization_inner(conn: &Connection, org: &Organization) -> WayfinderResult<EntityId> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM organizations WHERE name = ?1 AND country IS ?2",
            params![org.name, org.country],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match existing {
        Some(id) => {
            conn.execute(
                "UPDATE organizations SET
                    city = ?2, website = ?3, description = ?4, undergraduate_programs = ?5,
                    graduate_programs = ?6, tuition_undergrad = ?7, tuition_grad = ?8,
                    living_cost = ?9, application_deadlines = ?10, admission_requirements = ?11,
                    scholarships = ?12, campus_facilities = ?13,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![
                    id,
                    org.city,
                    org.website,
                    org.description,
                    org.undergraduate_programs,
                    org.graduate_programs,
                    org.tuition_undergrad,
                    org.tuition_grad,
                    org.living_cost,
                    org.application_deadlines,
                    org.admission_requirements,
                    org.scholarships,
                    org.campus_facilities,
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            super::embedding_ops::delete_embedding(conn, EntityClass::Organization, EntityId(id))?;
            tracing::debug!(id, name = %org.name, "updated organization");
            Ok(EntityId(id))
        }
        None => {
            conn.execute(
                "INSERT INTO organizations (
                    name, country, city, website, description, undergraduate_programs,
                    graduate_programs, tuition_undergrad, tuition_grad, living_cost,
                    application_deadlines, admission_requirements, scholarships, campus_facilities
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    org.name,
                    org.country,
                    org.city,
                    org.website,
                    org.description,
                    org.undergraduate_programs,
                    org.graduate_programs,
                    org.tuition_undergrad,
                    org.tuition_grad,
                    org.living_cost,
                    org.application_deadlines,
                    org.admission_requirements,
                    org.scholarships,
                    org.campus_facilities,
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            let id = conn.last_insert_rowid();
            tracing::debug!(id, name = %org.name, "inserted organization");
            Ok(EntityId(id))
        }
    }
}

fn upsert_program_inner(conn: &Connection, program: &Program) -> WayfinderResult<EntityId> {
    let owner_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE id = ?1)",
            params![program.organization_id.get()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !owner_exists {
        return Err(WayfinderError::EntityNotFound {
            class: EntityClass::Organization,
            id: program.organization_id,
        });
    }

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM programs WHERE name = ?1 AND organization_id = ?2",
            params![program.name, program.organization_id.get()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match existing {
        Some(id) => {
            conn.execute(
                "UPDATE programs SET
                    description = ?2, degree_type = ?3, field_of_study = ?4, duration = ?5,
                    tuition_fee = ?6, application_deadline = ?7, admission_requirements = ?8,
                    scholarships = ?9, language_of_study = ?10, starting_date = ?11,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![
                    id,
                    program.description,
                    program.degree_type,
                    program.field_of_study,
                    program.duration,
                    program.tuition_fee,
                    program.application_deadline,
                    program.admission_requirements,
                    program.scholarships,
                    program.language_of_study,
                    program.starting_date,
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            super::embedding_ops::delete_embedding(conn, EntityClass::Program, EntityId(id))?;
            tracing::debug!(id, name = %program.name, "updated program");
            Ok(EntityId(id))
        }
        None => {
            conn.execute(
                "INSERT INTO programs (
                    organization_id, name, description, degree_type, field_of_study, duration,
                    tuition_fee, application_deadline, admission_requirements, scholarships,
                    language_of_study, starting_date
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    program.organization_id.get(),
                    program.name,
                    program.description,
                    program.degree_type,
                    program.field_of_study,
                    program.duration,
                    program.tuition_fee,
                    program.application_deadline,
                    program.admission_requirements,
                    program.scholarships,
                    program.language_of_study,
                    program.starting_date,
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            let id = conn.last_insert_rowid();
            tracing::debug!(id, name = %program.name, "inserted program");
            Ok(EntityId(id))
        }
    }
}

/// Delete an entity and every embedding that depends on it.
/// Deleting an organization cascades to its programs and their embeddings.
pub fn delete_entity(conn: &Connection, class: EntityClass, id: EntityId) -> WayfinderResult<bool> {
    conn.execute_batch("SAVEPOINT delete_entity")
        .map_err(|e| to_storage_err(format!("delete savepoint: {e}")))?;

    match delete_entity_inner(conn, class, id) {
        Ok(existed) => {
            conn.execute_batch("RELEASE delete_entity")
                .map_err(|e| to_storage_err(format!("delete release: {e}")))?;
            Ok(existed)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO delete_entity");
            let _ = conn.execute_batch("RELEASE delete_entity");
            Err(e)
        }
    }
}

fn delete_entity_inner(
    conn: &Connection,
    class: EntityClass,
    id: EntityId,
) -> WayfinderResult<bool> {
    if class == EntityClass::Organization {
        conn.execute(
            "DELETE FROM entity_embeddings
             WHERE entity_class = 'program'
               AND entity_id IN (SELECT id FROM programs WHERE organization_id = ?1)",
            params![id.get()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    super::embedding_ops::delete_embedding(conn, class, id)?;
    let sql = format!("DELETE FROM {} WHERE id = ?1", table_for(class));
    let removed = conn
        .execute(&sql, params![id.get()])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

/// Entities of `class` with no stored embedding, ascending id.
pub fn list_unembedded(
    conn: &Connection,
    class: EntityClass,
    limit: usize,
) -> WayfinderResult<Vec<Entity>> {
    let sql = format!(
        "SELECT {} FROM {} t
         WHERE NOT EXISTS (
            SELECT 1 FROM entity_embeddings e
            WHERE e.entity_class = ?1 AND e.entity_id = t.id
         )
         ORDER BY t.id
         LIMIT ?2",
        columns_for(class),
        table_for(class)
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![class.as_str(), limit as i64], |row| parse_row(class, row))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}

/// Number of rows of `class`.
pub fn count_entities(conn: &Connection, class: EntityClass) -> WayfinderResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", table_for(class));
    let count: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}
