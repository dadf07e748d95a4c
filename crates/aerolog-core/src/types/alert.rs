//! Per-aircraft alert state and the append-only audit trail.
//!
//! The alert flag means "new baseline publications exist since the last
//! review". It never means missing, overdue, or non-compliant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reference::ReferenceIdentifier;

/// Mutable per-aircraft alert record.
///
/// `has_new_items` is derived: it is true exactly when `count_new > 0`.
/// Fields are private so all mutation goes through [`flag_new_items`],
/// [`record_checked`], and [`clear_for_review`], which keep the pairing
/// intact.
///
/// [`flag_new_items`]: AlertState::flag_new_items
/// [`record_checked`]: AlertState::record_checked
/// [`clear_for_review`]: AlertState::clear_for_review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertState {
    aircraft_id: String,
    count_new: u32,
    last_reviewed_at: Option<DateTime<Utc>>,
    last_detection_at: Option<DateTime<Utc>>,
    last_checked_version: Option<String>,
    /// Baseline identifiers known as of the last detection run.
    known_refs: Vec<ReferenceIdentifier>,
}

impl AlertState {
    /// Initial (Clear) state, created on the first detection run.
    pub fn new(aircraft_id: &str) -> Self {
        Self {
            aircraft_id: aircraft_id.to_string(),
            count_new: 0,
            last_reviewed_at: None,
            last_detection_at: None,
            last_checked_version: None,
            known_refs: Vec::new(),
        }
    }

    /// Rebuild a state from persisted fields.
    pub fn from_parts(
        aircraft_id: String,
        count_new: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
        last_detection_at: Option<DateTime<Utc>>,
        last_checked_version: Option<String>,
        known_refs: Vec<ReferenceIdentifier>,
    ) -> Self {
        Self {
            aircraft_id,
            count_new,
            last_reviewed_at,
            last_detection_at,
            last_checked_version,
            known_refs,
        }
    }

    pub fn aircraft_id(&self) -> &str {
        &self.aircraft_id
    }

    pub fn has_new_items(&self) -> bool {
        self.count_new > 0
    }

    pub fn count_new(&self) -> u32 {
        self.count_new
    }

    pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }

    pub fn last_detection_at(&self) -> Option<DateTime<Utc>> {
        self.last_detection_at
    }

    pub fn last_checked_version(&self) -> Option<&str> {
        self.last_checked_version.as_deref()
    }

    pub fn known_refs(&self) -> &[ReferenceIdentifier] {
        &self.known_refs
    }

    /// Detection found `delta` new baseline items. The count only ever
    /// grows here; review is the single path back to zero.
    pub fn flag_new_items(&mut self, delta: u32, now: DateTime<Utc>) {
        self.count_new += delta;
        self.last_detection_at = Some(now);
    }

    /// Advance the stored baseline snapshot and version after a
    /// successful detection run (flagging or not).
    pub fn record_checked(
        &mut self,
        version: &str,
        snapshot: Vec<ReferenceIdentifier>,
        now: DateTime<Utc>,
    ) {
        self.last_checked_version = Some(version.to_string());
        self.known_refs = snapshot;
        self.last_detection_at = Some(now);
    }

    /// Unconditionally transition to Clear. Returns the count that was
    /// cleared (0 when already Clear).
    pub fn clear_for_review(&mut self, now: DateTime<Utc>) -> u32 {
        let cleared = self.count_new;
        self.count_new = 0;
        self.last_reviewed_at = Some(now);
        cleared
    }

    /// Read view merged into the aircraft's external representation.
    pub fn status(&self) -> AlertStatus {
        AlertStatus {
            aircraft_id: self.aircraft_id.clone(),
            has_new_items: self.has_new_items(),
            count_new: self.count_new,
            last_checked_version: self.last_checked_version.clone(),
            last_reviewed_at: self.last_reviewed_at,
            last_detection_at: self.last_detection_at,
        }
    }
}

/// Externally visible alert flags for one aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertStatus {
    pub aircraft_id: String,
    pub has_new_items: bool,
    pub count_new: u32,
    pub last_checked_version: Option<String>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub last_detection_at: Option<DateTime<Utc>>,
}

/// Kinds of audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    /// A detection run found new baseline items.
    Detected,
    /// A user marked the aircraft's AD/SB module reviewed.
    Reviewed,
}

impl AuditEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            AuditEventKind::Detected => "DETECTED",
            AuditEventKind::Reviewed => "REVIEWED",
        }
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Append-only record of a detection run or review action.
/// Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub aircraft_id: String,
    pub kind: AuditEventKind,
    /// References added (Detected) or cleared (Reviewed).
    pub delta: u32,
    /// Identifiers involved, capped for storage.
    pub refs: Vec<ReferenceIdentifier>,
    /// Who triggered the event: "system", "scheduled", or "user:{id}".
    pub actor: String,
    /// Baseline data version in effect, when known.
    pub version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        aircraft_id: &str,
        kind: AuditEventKind,
        delta: u32,
        refs: Vec<ReferenceIdentifier>,
        actor: &str,
        version: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            aircraft_id: aircraft_id.to_string(),
            kind,
            delta,
            refs,
            actor: actor.to_string(),
            version: version.map(str::to_string),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::reference::ReferenceKind;

    fn ident(normalized: &str) -> ReferenceIdentifier {
        ReferenceIdentifier {
            raw: normalized.to_string(),
            normalized: normalized.to_string(),
            kind: ReferenceKind::Ad,
        }
    }

    #[test]
    fn test_new_state_is_clear() {
        let state = AlertState::new("ac-1");
        assert!(!state.has_new_items());
        assert_eq!(state.count_new(), 0);
    }

    #[test]
    fn test_flag_pairs_flag_with_count() {
        let mut state = AlertState::new("ac-1");
        state.flag_new_items(3, Utc::now());
        assert!(state.has_new_items());
        assert_eq!(state.count_new(), 3);

        // Additional items accumulate, never decrease
        state.flag_new_items(2, Utc::now());
        assert_eq!(state.count_new(), 5);
    }

    #[test]
    fn test_review_clears_unconditionally() {
        let mut state = AlertState::new("ac-1");
        state.flag_new_items(4, Utc::now());
        let cleared = state.clear_for_review(Utc::now());
        assert_eq!(cleared, 4);
        assert!(!state.has_new_items());
        assert_eq!(state.count_new(), 0);
        assert!(state.last_reviewed_at().is_some());

        // Reviewing an already-Clear state is a no-op on the count
        assert_eq!(state.clear_for_review(Utc::now()), 0);
        assert!(!state.has_new_items());
    }

    #[test]
    fn test_record_checked_updates_snapshot() {
        let mut state = AlertState::new("ac-1");
        state.record_checked("2026-07", vec![ident("2024-01")], Utc::now());
        assert_eq!(state.last_checked_version(), Some("2026-07"));
        assert_eq!(state.known_refs().len(), 1);
        assert!(!state.has_new_items());
    }
}
