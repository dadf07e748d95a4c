//! Derived reconciliation views.
//!
//! Views are factual only: `seen` / `not seen` / counts. No view field
//! ever expresses a compliance judgement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aerolog_core::types::ReferenceIdentifier;

/// Per-baseline-reference comparison entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub identifier: ReferenceIdentifier,
    /// True iff the reference appears in the aircraft's OCR scans.
    pub seen: bool,
    pub occurrence_count: u32,
    pub last_seen_date: Option<DateTime<Utc>>,
}

/// OCR-vs-baseline view: which baseline references appear in scans.
///
/// Invariant: `seen_count + not_seen_count == total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineView {
    pub total: usize,
    pub seen_count: usize,
    pub not_seen_count: usize,
    pub entries: Vec<BaselineEntry>,
}

/// Per-user-imported-reference comparison entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEntry {
    pub identifier: ReferenceIdentifier,
    pub seen_in_scans: bool,
    pub scan_count: u32,
    pub last_scan_date: Option<DateTime<Utc>>,
}

/// OCR-vs-user-imports view.
///
/// Invariant: `seen_count + not_seen_count == total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportView {
    pub total: usize,
    pub seen_count: usize,
    pub not_seen_count: usize,
    pub entries: Vec<ImportEntry>,
}

/// Baseline references absent from the previously-known snapshot.
/// The only view that can flip an aircraft's alert state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItemsDelta {
    pub count: usize,
    pub refs: Vec<ReferenceIdentifier>,
}

impl NewItemsDelta {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
