//! Table queries: reference stores, alert state, audit log.

pub mod alerts;
pub mod audit;
pub mod baseline;
pub mod imports;
pub mod scans;

use chrono::{DateTime, SecondsFormat, Utc};

use aerolog_core::errors::StorageError;
use aerolog_core::types::ReferenceKind;

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub(crate) fn ts_to_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn ts_from_text(text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidRow {
            message: format!("bad timestamp {text:?}: {e}"),
        })
}

pub(crate) fn kind_from_text(text: &str) -> Result<ReferenceKind, StorageError> {
    match text {
        "AD" => Ok(ReferenceKind::Ad),
        "SB" => Ok(ReferenceKind::Sb),
        other => Err(StorageError::InvalidRow {
            message: format!("unknown reference kind {other:?}"),
        }),
    }
}

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
