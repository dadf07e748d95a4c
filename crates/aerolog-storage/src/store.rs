//! [`AlertStore`] implementation over SQLite.
//!
//! State and audit events land in one BEGIN IMMEDIATE transaction, so
//! a transition is either fully recorded or not recorded at all.

use aerolog_core::errors::StorageError;
use aerolog_core::traits::AlertStore;
use aerolog_core::types::{AlertState, AuditEvent};

use crate::connection::DatabaseManager;
use crate::queries::{alerts, audit};

impl AlertStore for DatabaseManager {
    fn load(&self, aircraft_id: &str) -> Result<Option<AlertState>, StorageError> {
        self.with_conn(|conn| alerts::load_alert_state(conn, aircraft_id))
    }

    fn save_and_log(&self, state: &AlertState, events: &[AuditEvent]) -> Result<(), StorageError> {
        self.with_immediate_tx(|tx| {
            alerts::save_alert_state(tx, state)?;
            for event in events {
                audit::append_event(tx, event)?;
            }
            Ok(())
        })
    }
}
