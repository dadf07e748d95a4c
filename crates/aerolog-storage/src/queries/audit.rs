//! audit_log table queries. Append-only: rows are inserted by state
//! transitions and never updated or deleted.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use aerolog_core::errors::StorageError;
use aerolog_core::types::{AuditEvent, AuditEventKind, ReferenceIdentifier};

use super::{sqlite_err, ts_from_text, ts_to_text};

/// Append one audit event.
pub fn append_event(conn: &Connection, event: &AuditEvent) -> Result<(), StorageError> {
    let refs = serde_json::to_string(&event.refs).map_err(|e| StorageError::InvalidRow {
        message: format!("serialize refs: {e}"),
    })?;

    conn.execute(
        "INSERT INTO audit_log (id, aircraft_id, kind, delta, refs, actor, version, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            event.id.to_string(),
            event.aircraft_id,
            event.kind.name(),
            event.delta,
            refs,
            event.actor,
            event.version,
            ts_to_text(event.created_at),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Query audit events for an aircraft within an optional time range,
/// most recent first.
pub fn events_for_aircraft(
    conn: &Connection,
    aircraft_id: &str,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    limit: u32,
) -> Result<Vec<AuditEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, aircraft_id, kind, delta, refs, actor, version, created_at
             FROM audit_log
             WHERE aircraft_id = ?1
               AND (?2 IS NULL OR created_at >= ?2)
               AND (?3 IS NULL OR created_at <= ?3)
             ORDER BY created_at DESC
             LIMIT ?4",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(
            params![
                aircraft_id,
                since.map(ts_to_text),
                until.map(ts_to_text),
                limit,
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, String>(7)?,
                ))
            },
        )
        .map_err(sqlite_err)?;

    let mut events = Vec::new();
    for row in rows {
        let (id, aircraft_id, kind, delta, refs, actor, version, created_at) =
            row.map_err(sqlite_err)?;

        let refs: Vec<ReferenceIdentifier> =
            serde_json::from_str(&refs).map_err(|e| StorageError::InvalidRow {
                message: format!("bad refs payload: {e}"),
            })?;

        events.push(AuditEvent {
            id: Uuid::parse_str(&id).map_err(|e| StorageError::InvalidRow {
                message: format!("bad event id {id:?}: {e}"),
            })?,
            aircraft_id,
            kind: kind_from_name(&kind)?,
            delta,
            refs,
            actor,
            version,
            created_at: ts_from_text(&created_at)?,
        });
    }
    Ok(events)
}

fn kind_from_name(name: &str) -> Result<AuditEventKind, StorageError> {
    match name {
        "DETECTED" => Ok(AuditEventKind::Detected),
        "REVIEWED" => Ok(AuditEventKind::Reviewed),
        other => Err(StorageError::InvalidRow {
            message: format!("unknown audit event kind {other:?}"),
        }),
    }
}
