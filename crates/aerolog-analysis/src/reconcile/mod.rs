//! AD/SB reference normalization, extraction, and set reconciliation.

pub mod engine;
pub mod extract;
pub mod normalizer;
pub mod views;

pub use engine::{baseline_view, import_view, new_since_snapshot, unique_identifiers};
pub use extract::{extract_references, ExtractedReference, ReferenceScope};
pub use normalizer::normalize;
pub use views::{BaselineEntry, BaselineView, ImportEntry, ImportView, NewItemsDelta};
