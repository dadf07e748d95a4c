//! AD/SB reference identifiers, records, and aircraft designators.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of regulatory reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceKind {
    Ad,
    Sb,
}

impl ReferenceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceKind::Ad => "AD",
            ReferenceKind::Sb => "SB",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which store a reference record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceOrigin {
    /// Canonical regulator-sourced registry.
    TcBaseline,
    /// Reference imported by the user from an uploaded PDF.
    UserImportedReference,
    /// Reference detected in an OCR document scan.
    OcrScan,
}

/// Canonical form of an AD/SB designator.
///
/// Equality and hashing use only `(normalized, kind)` — two identifiers
/// are the same reference regardless of source formatting. `raw`
/// preserves the original spelling for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceIdentifier {
    pub raw: String,
    pub normalized: String,
    pub kind: ReferenceKind,
}

impl PartialEq for ReferenceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized && self.kind == other.kind
    }
}

impl Eq for ReferenceIdentifier {}

impl Hash for ReferenceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
        self.kind.hash(state);
    }
}

impl std::fmt::Display for ReferenceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.kind, self.normalized)
    }
}

/// One AD/SB reference tied to an aircraft (or, for baseline records,
/// to a designator). Records of different origins sharing a normalized
/// identifier are joined by reconciliation, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub identifier: ReferenceIdentifier,
    pub origin: ReferenceOrigin,
    /// Designator for baseline records; the owning aircraft id otherwise.
    pub subject: String,
    /// Times the reference was seen in OCR scans (1 for non-scan origins).
    pub occurrence_count: u32,
    /// Most recent scan date, when known.
    pub last_seen_date: Option<DateTime<Utc>>,
    /// Pointers to the source documents the reference was taken from.
    pub source_documents: Vec<String>,
}

impl ReferenceRecord {
    /// Build a record with no occurrence history.
    pub fn new(identifier: ReferenceIdentifier, origin: ReferenceOrigin, subject: &str) -> Self {
        Self {
            identifier,
            origin,
            subject: subject.to_string(),
            occurrence_count: 1,
            last_seen_date: None,
            source_documents: Vec::new(),
        }
    }
}

/// Aircraft-type designator used for baseline applicability lookup.
///
/// Placeholder values and registration-shaped strings are rejected at
/// parse time; detection skips such aircraft rather than guessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Designator(String);

impl Designator {
    /// Placeholder values that must never be used for lookup.
    const INVALID: [&'static str; 5] = ["AUCUN", "N/A", "NONE", "NULL", "UNKNOWN"];

    /// Parse a usable designator, or `None` when the value cannot be
    /// trusted for applicability lookup.
    pub fn parse(raw: &str) -> Option<Designator> {
        let cleaned = raw.trim().to_uppercase();
        if cleaned.is_empty() || Self::INVALID.contains(&cleaned.as_str()) {
            return None;
        }
        // Registration patterns (C-GABC / CGABC) are identities, not types
        if cleaned.starts_with("C-") {
            return None;
        }
        if cleaned.len() == 5
            && cleaned.starts_with('C')
            && cleaned[1..].chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        Some(Designator(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Designator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
