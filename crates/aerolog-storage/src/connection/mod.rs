//! Database connection management — WAL mode, serialized writer.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};

use aerolog_core::errors::StorageError;

use crate::migrations;

/// Owns the SQLite connection and serializes access to it.
///
/// One writer connection behind a `Mutex` is sufficient here: every
/// operation is a short single-pass read or a small transaction, and
/// per-aircraft ordering is already enforced above this layer.
pub struct DatabaseManager {
    conn: Mutex<Connection>,
}

impl DatabaseManager {
    /// Open (or create) the database at `path` and apply migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: format!("open {}: {e}", path.display()),
        })?;
        Self::init(conn)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: format!("open in-memory: {e}"),
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StorageError::SqliteError {
                message: format!("pragma synchronous: {e}"),
            })?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StorageError::SqliteError {
                message: format!("pragma foreign_keys: {e}"),
            })?;

        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database connection poisoned")
    }

    /// Run a read or standalone write against the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let conn = self.lock();
        f(&conn)
    }

    /// Run `f` inside a BEGIN IMMEDIATE transaction. The write lock is
    /// acquired at transaction start, preventing SQLITE_BUSY mid-write;
    /// any error rolls the whole transaction back.
    pub fn with_immediate_tx<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut conn = self.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StorageError::SqliteError {
                message: format!("begin immediate: {e}"),
            })?;

        let result = f(&tx)?;

        tx.commit().map_err(|e| StorageError::SqliteError {
            message: format!("commit: {e}"),
        })?;
        Ok(result)
    }
}
