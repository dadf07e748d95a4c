//! # aerolog-analysis
//!
//! Classification and reconciliation engine for scanned maintenance
//! documents: bilingual pattern scoring, report-type classification,
//! AD/SB reference normalization and extraction, reconciliation views,
//! and alert state management.
//!
//! Everything here is informational. The engine reports factual
//! presence/absence of references and suggested report types; it never
//! infers airworthiness or compliance status.

pub mod alerts;
pub mod classify;
pub mod reconcile;
