//! User-imported reference store (references extracted from PDFs the
//! user uploaded, tied to one aircraft).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use aerolog_core::errors::StorageError;
use aerolog_core::types::{ReferenceIdentifier, ReferenceOrigin, ReferenceRecord};

use super::{kind_from_text, sqlite_err, ts_from_text, ts_to_text};

/// One imported reference to upsert.
#[derive(Debug, Clone)]
pub struct ImportedRefRow {
    pub aircraft_id: String,
    pub identifier: ReferenceIdentifier,
    pub title: Option<String>,
    pub scope: String,
    pub pdf_filename: Option<String>,
    pub imported_at: DateTime<Utc>,
}

/// Upsert an imported reference. Re-importing the same identifier for
/// the same aircraft refreshes the import metadata instead of
/// duplicating the row.
pub fn upsert_imported_ref(conn: &Connection, row: &ImportedRefRow) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO imported_refs
             (aircraft_id, identifier, raw, kind, title, scope, pdf_filename, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(aircraft_id, identifier, kind) DO UPDATE SET
                 raw = excluded.raw,
                 title = excluded.title,
                 scope = excluded.scope,
                 pdf_filename = excluded.pdf_filename,
                 imported_at = excluded.imported_at",
        )
        .map_err(sqlite_err)?;

    stmt.execute(params![
        row.aircraft_id,
        row.identifier.normalized,
        row.identifier.raw,
        row.identifier.kind.name(),
        row.title,
        row.scope,
        row.pdf_filename,
        ts_to_text(row.imported_at),
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// All imported references for an aircraft, as reconciliation records.
pub fn refs_for_aircraft(
    conn: &Connection,
    aircraft_id: &str,
) -> Result<Vec<ReferenceRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT identifier, raw, kind, pdf_filename, imported_at
             FROM imported_refs WHERE aircraft_id = ?1 ORDER BY identifier",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![aircraft_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (normalized, raw, kind, pdf_filename, imported_at) = row.map_err(sqlite_err)?;
        ts_from_text(&imported_at)?; // reject corrupt rows early
        records.push(ReferenceRecord {
            identifier: ReferenceIdentifier {
                raw,
                normalized,
                kind: kind_from_text(&kind)?,
            },
            origin: ReferenceOrigin::UserImportedReference,
            subject: aircraft_id.to_string(),
            occurrence_count: 1,
            last_seen_date: None,
            source_documents: pdf_filename.into_iter().collect(),
        });
    }
    Ok(records)
}

/// Delete one imported reference. Returns whether a row was removed.
pub fn delete_imported_ref(
    conn: &Connection,
    aircraft_id: &str,
    identifier: &ReferenceIdentifier,
) -> Result<bool, StorageError> {
    let removed = conn
        .execute(
            "DELETE FROM imported_refs
             WHERE aircraft_id = ?1 AND identifier = ?2 AND kind = ?3",
            params![aircraft_id, identifier.normalized, identifier.kind.name()],
        )
        .map_err(sqlite_err)?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabaseManager;
    use aerolog_analysis::reconcile::normalize;
    use aerolog_core::types::ReferenceKind;

    fn imported(aircraft_id: &str, raw: &str, pdf: &str) -> ImportedRefRow {
        ImportedRefRow {
            aircraft_id: aircraft_id.to_string(),
            identifier: normalize(raw, Some(ReferenceKind::Ad)),
            title: None,
            scope: "UNSPECIFIED".to_string(),
            pdf_filename: Some(pdf.to_string()),
            imported_at: Utc::now(),
        }
    }

    #[test]
    fn test_reimport_refreshes_instead_of_duplicating() {
        let db = DatabaseManager::open_in_memory().unwrap();
        db.with_conn(|conn| {
            upsert_imported_ref(conn, &imported("ac-1", "CF-2020-01", "first.pdf"))?;
            upsert_imported_ref(conn, &imported("ac-1", "cf 2020-01", "second.pdf"))
        })
        .unwrap();

        let records = db.with_conn(|conn| refs_for_aircraft(conn, "ac-1")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_documents, vec!["second.pdf".to_string()]);
    }

    #[test]
    fn test_imports_are_scoped_per_aircraft() {
        let db = DatabaseManager::open_in_memory().unwrap();
        db.with_conn(|conn| {
            upsert_imported_ref(conn, &imported("ac-1", "CF-2020-01", "a.pdf"))?;
            upsert_imported_ref(conn, &imported("ac-2", "CF-2020-01", "b.pdf"))
        })
        .unwrap();

        assert_eq!(db.with_conn(|c| refs_for_aircraft(c, "ac-1")).unwrap().len(), 1);
        assert_eq!(db.with_conn(|c| refs_for_aircraft(c, "ac-2")).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_imported_ref() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let id = normalize("CF-2020-01", Some(ReferenceKind::Ad));
        db.with_conn(|conn| upsert_imported_ref(conn, &imported("ac-1", "CF-2020-01", "a.pdf")))
            .unwrap();

        assert!(db.with_conn(|c| delete_imported_ref(c, "ac-1", &id)).unwrap());
        assert!(!db.with_conn(|c| delete_imported_ref(c, "ac-1", &id)).unwrap());
    }
}
