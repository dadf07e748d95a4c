//! Schema migrations, applied in order via PRAGMA user_version.

use rusqlite::Connection;
use tracing::debug;

use aerolog_core::errors::StorageError;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS baseline_refs (
    id INTEGER PRIMARY KEY,
    identifier TEXT NOT NULL,
    raw TEXT NOT NULL,
    kind TEXT NOT NULL,
    designator TEXT,
    manufacturer TEXT,
    model TEXT,
    title TEXT,
    effective_date TEXT,
    version TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    UNIQUE(identifier, kind, designator)
);
CREATE INDEX IF NOT EXISTS idx_baseline_designator ON baseline_refs(designator);

CREATE TABLE IF NOT EXISTS imported_refs (
    id INTEGER PRIMARY KEY,
    aircraft_id TEXT NOT NULL,
    identifier TEXT NOT NULL,
    raw TEXT NOT NULL,
    kind TEXT NOT NULL,
    title TEXT,
    scope TEXT NOT NULL DEFAULT 'UNSPECIFIED',
    pdf_filename TEXT,
    imported_at TEXT NOT NULL,
    UNIQUE(aircraft_id, identifier, kind)
);
CREATE INDEX IF NOT EXISTS idx_imported_aircraft ON imported_refs(aircraft_id);

CREATE TABLE IF NOT EXISTS scan_refs (
    id INTEGER PRIMARY KEY,
    aircraft_id TEXT NOT NULL,
    identifier TEXT NOT NULL,
    raw TEXT NOT NULL,
    kind TEXT NOT NULL,
    occurrence_count INTEGER NOT NULL DEFAULT 1,
    last_seen_date TEXT,
    source_documents TEXT NOT NULL DEFAULT '[]',
    UNIQUE(aircraft_id, identifier, kind)
);
CREATE INDEX IF NOT EXISTS idx_scan_aircraft ON scan_refs(aircraft_id);

CREATE TABLE IF NOT EXISTS alert_state (
    aircraft_id TEXT PRIMARY KEY,
    count_new INTEGER NOT NULL DEFAULT 0,
    last_reviewed_at TEXT,
    last_detection_at TEXT,
    last_checked_version TEXT,
    known_refs TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS audit_log (
    id TEXT PRIMARY KEY,
    aircraft_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    delta INTEGER NOT NULL DEFAULT 0,
    refs TEXT NOT NULL DEFAULT '[]',
    actor TEXT NOT NULL,
    version TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_audit_aircraft ON audit_log(aircraft_id, created_at);
";

const MIGRATIONS: &[&str] = &[SCHEMA_V1];

/// Apply pending migrations. Idempotent.
pub fn run(conn: &Connection) -> Result<(), StorageError> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: format!("read user_version: {e}"),
        })?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let target = (idx + 1) as i64;
        if current >= target {
            continue;
        }
        conn.execute_batch(migration)
            .map_err(|e| StorageError::SqliteError {
                message: format!("migration {target}: {e}"),
            })?;
        conn.pragma_update(None, "user_version", target)
            .map_err(|e| StorageError::SqliteError {
                message: format!("set user_version {target}: {e}"),
            })?;
        debug!(version = target, "applied schema migration");
    }

    Ok(())
}
