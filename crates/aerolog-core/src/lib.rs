//! # aerolog-core
//!
//! Core types, traits, errors, and configuration for the aerolog
//! maintenance-document classification and AD/SB reconciliation engine.

pub mod config;
pub mod errors;
pub mod telemetry;
pub mod traits;
pub mod types;
