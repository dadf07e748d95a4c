//! Canonical baseline registry queries (regulator-sourced, read-only
//! ground truth for detection).

use rusqlite::{params, Connection};

use aerolog_core::errors::StorageError;
use aerolog_core::types::{
    Designator, ReferenceIdentifier, ReferenceOrigin, ReferenceRecord,
};

use super::{kind_from_text, sqlite_err};

/// A baseline registry row.
#[derive(Debug, Clone)]
pub struct BaselineRefRow {
    pub identifier: ReferenceIdentifier,
    pub designator: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub title: Option<String>,
    pub effective_date: Option<String>,
    /// Registry import version, "YYYY-MM".
    pub version: String,
}

/// Insert a batch of baseline references (a registry import).
pub fn insert_baseline_refs(
    conn: &Connection,
    rows: &[BaselineRefRow],
) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR REPLACE INTO baseline_refs
             (identifier, raw, kind, designator, manufacturer, model,
              title, effective_date, version, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1)",
        )
        .map_err(sqlite_err)?;

    let mut count = 0;
    for row in rows {
        stmt.execute(params![
            row.identifier.normalized,
            row.identifier.raw,
            row.identifier.kind.name(),
            row.designator,
            row.manufacturer,
            row.model,
            row.title,
            row.effective_date,
            row.version,
        ])
        .map_err(sqlite_err)?;
        count += 1;
    }
    Ok(count)
}

/// All active baseline references applicable to an aircraft.
///
/// Matches by designator first; rows without a designator hit are also
/// matched by manufacturer plus model family (`172M` matches a `172`
/// row, comma-separated model lists match any entry).
pub fn refs_for_aircraft_type(
    conn: &Connection,
    designator: &Designator,
    manufacturer: Option<&str>,
    model: Option<&str>,
) -> Result<Vec<ReferenceRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT identifier, raw, kind, designator, manufacturer, model
             FROM baseline_refs
             WHERE is_active = 1
               AND (designator = ?1 OR manufacturer IS NOT NULL)
             ORDER BY identifier",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![designator.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (normalized, raw, kind, row_designator, row_manufacturer, row_model) =
            row.map_err(sqlite_err)?;

        let by_designator = row_designator.as_deref() == Some(designator.as_str());
        let by_model = match (manufacturer, model, &row_manufacturer, &row_model) {
            (Some(mfr), Some(mdl), Some(row_mfr), Some(row_mdl)) => {
                mfr.eq_ignore_ascii_case(row_mfr) && model_matches(mdl, row_mdl)
            }
            _ => false,
        };
        if !by_designator && !by_model {
            continue;
        }

        records.push(ReferenceRecord {
            identifier: ReferenceIdentifier {
                raw,
                normalized,
                kind: kind_from_text(&kind)?,
            },
            origin: ReferenceOrigin::TcBaseline,
            subject: designator.as_str().to_string(),
            occurrence_count: 1,
            last_seen_date: None,
            source_documents: Vec::new(),
        });
    }
    Ok(records)
}

/// Current baseline data version, from the most recent import.
pub fn current_version(conn: &Connection) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT MAX(version) FROM baseline_refs WHERE is_active = 1",
        [],
        |row| row.get(0),
    )
    .map_err(sqlite_err)
}

/// Does the aircraft model fall under an AD/SB model specification?
///
/// Supports exact match, family prefix ("172M" under "172"), and
/// comma-separated lists ("150, 152").
fn model_matches(aircraft_model: &str, spec: &str) -> bool {
    let aircraft = normalize_model(aircraft_model);
    if aircraft.is_empty() {
        return false;
    }
    spec.split(',').any(|token| {
        let token = normalize_model(token);
        !token.is_empty()
            && (aircraft == token || aircraft.starts_with(&token) || token.starts_with(&aircraft))
    })
}

fn normalize_model(model: &str) -> String {
    model
        .trim()
        .to_uppercase()
        .replace([' ', '-'], "")
}
