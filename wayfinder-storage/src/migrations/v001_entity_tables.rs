//! v001: organizations, programs.

use rusqlite::Connection;

use wayfinder_core::errors::WayfinderResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WayfinderResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS organizations (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            name                    TEXT NOT NULL,
            country                 TEXT,
            city                    TEXT,
            website                 TEXT,
            description             TEXT,
            undergraduate_programs  TEXT,
            graduate_programs       TEXT,
            tuition_undergrad       TEXT,
            tuition_grad            TEXT,
            living_cost             TEXT,
            application_deadlines   TEXT,
            admission_requirements  TEXT,
            scholarships            TEXT,
            campus_facilities       TEXT,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_organizations_name ON organizations(name, country);

        CREATE TABLE IF NOT EXISTS programs (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id         INTEGER NOT NULL,
            name                    TEXT NOT NULL,
            description             TEXT,
            degree_type             TEXT,
            field_of_study          TEXT,
            duration                TEXT,
            tuition_fee             TEXT,
            application_deadline    TEXT,
            admission_requirements  TEXT,
            scholarships            TEXT,
            language_of_study       TEXT,
            starting_date           TEXT,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (organization_id, name),
            FOREIGN KEY (organization_id) REFERENCES organizations(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_programs_organization ON programs(organization_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
