//! Shared traits used across aerolog crates.
//!
//! The analysis crate never talks to storage directly; it goes through
//! these seams so the engine stays pure and testable.

use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::alert::{AlertState, AuditEvent};

/// Persistence seam for per-aircraft alert state and its audit trail.
///
/// `save_and_log` must persist the state and the accompanying audit
/// events atomically: either both land or neither does. The alert
/// manager guarantees calls for one aircraft never overlap.
pub trait AlertStore {
    /// Load the alert state for an aircraft, if any detection run has
    /// created one.
    fn load(&self, aircraft_id: &str) -> Result<Option<AlertState>, StorageError>;

    /// Atomically persist the state and append the given audit events.
    fn save_and_log(&self, state: &AlertState, events: &[AuditEvent]) -> Result<(), StorageError>;
}

impl<S: AlertStore + ?Sized> AlertStore for Arc<S> {
    fn load(&self, aircraft_id: &str) -> Result<Option<AlertState>, StorageError> {
        (**self).load(aircraft_id)
    }

    fn save_and_log(&self, state: &AlertState, events: &[AuditEvent]) -> Result<(), StorageError> {
        (**self).save_and_log(state, events)
    }
}
