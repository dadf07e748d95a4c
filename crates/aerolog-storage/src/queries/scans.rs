//! OCR-scan reference store: per-aircraft occurrences of references
//! detected in scanned documents, aggregated by normalized identifier.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use aerolog_core::errors::StorageError;
use aerolog_core::types::{ReferenceIdentifier, ReferenceOrigin, ReferenceRecord};

use super::{kind_from_text, sqlite_err, ts_from_text, ts_to_text};

/// Record one occurrence of a reference in an OCR scan.
///
/// Repeated occurrences of the same normalized identifier increment
/// the occurrence count and advance the last-seen date; they never
/// create duplicate rows.
pub fn record_occurrence(
    conn: &Connection,
    aircraft_id: &str,
    identifier: &ReferenceIdentifier,
    scan_document: &str,
    seen_at: DateTime<Utc>,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO scan_refs
             (aircraft_id, identifier, raw, kind, occurrence_count, last_seen_date, source_documents)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, json_array(?6))
             ON CONFLICT(aircraft_id, identifier, kind) DO UPDATE SET
                 occurrence_count = occurrence_count + 1,
                 last_seen_date = MAX(COALESCE(last_seen_date, ''), excluded.last_seen_date),
                 source_documents = json_insert(source_documents, '$[#]', ?6)",
        )
        .map_err(sqlite_err)?;

    stmt.execute(params![
        aircraft_id,
        identifier.normalized,
        identifier.raw,
        identifier.kind.name(),
        ts_to_text(seen_at),
        scan_document,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// All scan references for an aircraft, as reconciliation records.
pub fn refs_for_aircraft(
    conn: &Connection,
    aircraft_id: &str,
) -> Result<Vec<ReferenceRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT identifier, raw, kind, occurrence_count, last_seen_date, source_documents
             FROM scan_refs WHERE aircraft_id = ?1 ORDER BY identifier",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![aircraft_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (normalized, raw, kind, occurrence_count, last_seen, source_documents) =
            row.map_err(sqlite_err)?;

        let last_seen_date = last_seen.map(|t| ts_from_text(&t)).transpose()?;
        let source_documents: Vec<String> =
            serde_json::from_str(&source_documents).map_err(|e| StorageError::InvalidRow {
                message: format!("bad source_documents payload: {e}"),
            })?;

        records.push(ReferenceRecord {
            identifier: ReferenceIdentifier {
                raw,
                normalized,
                kind: kind_from_text(&kind)?,
            },
            origin: ReferenceOrigin::OcrScan,
            subject: aircraft_id.to_string(),
            occurrence_count,
            last_seen_date,
            source_documents,
        });
    }
    Ok(records)
}
