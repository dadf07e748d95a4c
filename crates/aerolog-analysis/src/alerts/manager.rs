//! Per-aircraft alert state management.
//!
//! The flag means "new baseline publications exist since last review" —
//! never missing, never overdue, never non-compliant.
//!
//! Guardrails carried over from the detection data flow:
//! - incomplete baseline data → do nothing, report the skip;
//! - missing aircraft identity → skip, never guess;
//! - every state transition lands in the audit log atomically with the
//!   state itself.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use aerolog_core::config::DetectionConfig;
use aerolog_core::errors::StateError;
use aerolog_core::traits::AlertStore;
use aerolog_core::types::collections::FxHashMap;
use aerolog_core::types::{
    AlertState, AlertStatus, AuditEvent, AuditEventKind, Designator, ReferenceRecord,
};

use crate::reconcile;

/// Outcome of a single-aircraft detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub aircraft_id: String,
    pub new_items_found: bool,
    pub new_items_count: u32,
    /// Identifiers of the new items, capped for response size.
    pub new_items_refs: Vec<String>,
    pub version: String,
    pub skipped: bool,
    pub skip_reason: Option<String>,
}

impl DetectionOutcome {
    fn skipped(aircraft_id: &str, version: &str, reason: &str) -> Self {
        Self {
            aircraft_id: aircraft_id.to_string(),
            new_items_found: false,
            new_items_count: 0,
            new_items_refs: Vec::new(),
            version: version.to_string(),
            skipped: true,
            skip_reason: Some(reason.to_string()),
        }
    }
}

/// Outcome of a mark-reviewed action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub aircraft_id: String,
    /// Whether an active alert was cleared (false for a no-op review).
    pub alert_cleared: bool,
    pub previous_count: u32,
    pub reviewed_at: DateTime<Utc>,
}

/// One aircraft to process in a batch run, with its materialized
/// baseline. The caller resolves the designator and loads the records;
/// the manager never queries storage for them.
#[derive(Debug, Clone)]
pub struct DetectionTarget {
    pub aircraft_id: String,
    pub designator: Option<Designator>,
    pub baseline: Vec<ReferenceRecord>,
}

/// Summary of a batch detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub version: String,
    pub processed: usize,
    pub flagged: usize,
    pub skipped: usize,
    pub total_new_items: u32,
    pub outcomes: Vec<DetectionOutcome>,
    pub triggered_by: String,
    pub completed_at: DateTime<Utc>,
}

/// Serializes detection and review per aircraft and drives the alert
/// state machine over an [`AlertStore`].
///
/// Different aircraft are fully independent; for one aircraft the
/// read-modify-write is guarded by a per-aircraft try-lock, and
/// contention surfaces as a retryable [`StateError::Conflict`].
pub struct AlertStateManager<S: AlertStore> {
    store: S,
    config: DetectionConfig,
    locks: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
}

impl<S: AlertStore> AlertStateManager<S> {
    pub fn new(store: S, config: DetectionConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(FxHashMap::default()),
        }
    }

    fn aircraft_lock(&self, aircraft_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("aircraft lock map poisoned");
        locks
            .entry(aircraft_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run detection for one aircraft against its materialized
    /// baseline set.
    ///
    /// Computes the new-since-snapshot delta, flags the aircraft when
    /// the delta is non-empty, advances the stored snapshot/version,
    /// and appends a `DETECTED` audit event — atomically with the
    /// state. A zero-delta run changes nothing and writes no event.
    /// A run for an already-checked version is skipped unless `force`.
    pub fn run_detection(
        &self,
        aircraft_id: &str,
        baseline: &[ReferenceRecord],
        version: &str,
        force: bool,
        actor: &str,
    ) -> Result<DetectionOutcome, StateError> {
        let lock = self.aircraft_lock(aircraft_id);
        let _guard = lock.try_lock().map_err(|_| StateError::Conflict {
            aircraft_id: aircraft_id.to_string(),
        })?;

        let mut state = self
            .store
            .load(aircraft_id)?
            .unwrap_or_else(|| AlertState::new(aircraft_id));

        if !force && state.last_checked_version() == Some(version) {
            debug!(aircraft_id, version, "baseline version already checked, skipping");
            return Ok(DetectionOutcome::skipped(
                aircraft_id,
                version,
                &format!("already checked version {version}"),
            ));
        }

        let delta = reconcile::new_since_snapshot(baseline, state.known_refs());
        let now = Utc::now();
        // Snapshot everything currently applicable, seen or not
        let snapshot = reconcile::unique_identifiers(baseline);

        let mut events = Vec::new();
        if !delta.is_empty() {
            state.flag_new_items(delta.count as u32, now);
            let mut refs = delta.refs.clone();
            refs.truncate(self.config.audit_refs_cap);
            events.push(AuditEvent::new(
                aircraft_id,
                AuditEventKind::Detected,
                delta.count as u32,
                refs,
                actor,
                Some(version),
                now,
            ));
            info!(
                aircraft_id,
                new_items = delta.count,
                version,
                "new baseline items detected"
            );
        }
        state.record_checked(version, snapshot, now);

        // Atomic with the audit event: a failure leaves state untouched
        self.store.save_and_log(&state, &events)?;

        let mut new_items_refs: Vec<String> =
            delta.refs.iter().map(|r| r.to_string()).collect();
        new_items_refs.truncate(self.config.audit_refs_cap);

        Ok(DetectionOutcome {
            aircraft_id: aircraft_id.to_string(),
            new_items_found: !delta.is_empty(),
            new_items_count: delta.count as u32,
            new_items_refs,
            version: version.to_string(),
            skipped: false,
            skip_reason: None,
        })
    }

    /// Mark the AD/SB module reviewed for an aircraft.
    ///
    /// Unconditionally transitions to Clear and appends a `REVIEWED`
    /// audit event — also for a no-op review, for traceability.
    pub fn mark_reviewed(&self, aircraft_id: &str, actor: &str) -> Result<ReviewOutcome, StateError> {
        let lock = self.aircraft_lock(aircraft_id);
        let _guard = lock.try_lock().map_err(|_| StateError::Conflict {
            aircraft_id: aircraft_id.to_string(),
        })?;

        let mut state = self
            .store
            .load(aircraft_id)?
            .unwrap_or_else(|| AlertState::new(aircraft_id));

        let had_alert = state.has_new_items();
        let now = Utc::now();
        let cleared = state.clear_for_review(now);

        let event = AuditEvent::new(
            aircraft_id,
            AuditEventKind::Reviewed,
            cleared,
            Vec::new(),
            actor,
            state.last_checked_version(),
            now,
        );
        self.store.save_and_log(&state, &[event])?;

        info!(aircraft_id, cleared, actor, "alert state reviewed");

        Ok(ReviewOutcome {
            aircraft_id: aircraft_id.to_string(),
            alert_cleared: had_alert,
            previous_count: cleared,
            reviewed_at: now,
        })
    }

    /// Read the externally visible alert flags for an aircraft.
    pub fn alert_status(&self, aircraft_id: &str) -> Result<Option<AlertStatus>, StateError> {
        Ok(self.store.load(aircraft_id)?.map(|s| s.status()))
    }

    /// Run detection over a batch of aircraft.
    ///
    /// Targets without a usable designator are skipped with a reason;
    /// per-aircraft conflicts and storage failures are recorded in the
    /// summary rather than aborting the batch.
    pub fn run_detection_batch(
        &self,
        targets: &[DetectionTarget],
        version: &str,
        force: bool,
        actor: &str,
    ) -> DetectionSummary {
        let mut outcomes = Vec::with_capacity(targets.len());
        let mut flagged = 0;
        let mut skipped = 0;
        let mut total_new_items = 0;

        for target in targets {
            let outcome = if target.designator.is_none() {
                warn!(
                    aircraft_id = %target.aircraft_id,
                    "aircraft identity not found in registry, skipping detection"
                );
                DetectionOutcome::skipped(
                    &target.aircraft_id,
                    version,
                    "aircraft identity not found in registry",
                )
            } else {
                match self.run_detection(&target.aircraft_id, &target.baseline, version, force, actor)
                {
                    Ok(outcome) => outcome,
                    Err(StateError::Conflict { .. }) => DetectionOutcome::skipped(
                        &target.aircraft_id,
                        version,
                        "alert state busy, retry later",
                    ),
                    Err(StateError::Storage(e)) => {
                        warn!(aircraft_id = %target.aircraft_id, error = %e, "detection failed");
                        DetectionOutcome::skipped(&target.aircraft_id, version, &e.to_string())
                    }
                }
            };

            if outcome.skipped {
                skipped += 1;
            } else if outcome.new_items_found {
                flagged += 1;
                total_new_items += outcome.new_items_count;
            }
            outcomes.push(outcome);
        }

        info!(
            version,
            processed = outcomes.len(),
            flagged,
            skipped,
            total_new_items,
            triggered_by = actor,
            "batch detection complete"
        );

        DetectionSummary {
            version: version.to_string(),
            processed: outcomes.len(),
            flagged,
            skipped,
            total_new_items,
            outcomes,
            triggered_by: actor.to_string(),
            completed_at: Utc::now(),
        }
    }
}
