//! alert_state table queries.
//!
//! `has_new_items` is not stored: it is derived from `count_new` when
//! the row is rebuilt, so the pairing can never drift in storage.

use rusqlite::{params, Connection, OptionalExtension};

use aerolog_core::errors::StorageError;
use aerolog_core::types::{AlertState, ReferenceIdentifier};

use super::{sqlite_err, ts_from_text, ts_to_text};

/// Load the alert state for an aircraft.
pub fn load_alert_state(
    conn: &Connection,
    aircraft_id: &str,
) -> Result<Option<AlertState>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT count_new, last_reviewed_at, last_detection_at,
                    last_checked_version, known_refs
             FROM alert_state WHERE aircraft_id = ?1",
        )
        .map_err(sqlite_err)?;

    let row = stmt
        .query_row(params![aircraft_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .optional()
        .map_err(sqlite_err)?;

    let Some((count_new, reviewed, detection, version, known_refs)) = row else {
        return Ok(None);
    };

    let known_refs: Vec<ReferenceIdentifier> =
        serde_json::from_str(&known_refs).map_err(|e| StorageError::InvalidRow {
            message: format!("bad known_refs payload: {e}"),
        })?;

    Ok(Some(AlertState::from_parts(
        aircraft_id.to_string(),
        count_new,
        reviewed.map(|t| ts_from_text(&t)).transpose()?,
        detection.map(|t| ts_from_text(&t)).transpose()?,
        version,
        known_refs,
    )))
}

/// Persist the full alert state for an aircraft.
pub fn save_alert_state(conn: &Connection, state: &AlertState) -> Result<(), StorageError> {
    let known_refs =
        serde_json::to_string(state.known_refs()).map_err(|e| StorageError::InvalidRow {
            message: format!("serialize known_refs: {e}"),
        })?;

    conn.execute(
        "INSERT OR REPLACE INTO alert_state
         (aircraft_id, count_new, last_reviewed_at, last_detection_at,
          last_checked_version, known_refs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            state.aircraft_id(),
            state.count_new(),
            state.last_reviewed_at().map(ts_to_text),
            state.last_detection_at().map(ts_to_text),
            state.last_checked_version(),
            known_refs,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}
