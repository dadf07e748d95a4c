//! # aerolog-storage
//!
//! SQLite persistence layer for the aerolog engine. WAL mode,
//! write-serialized connection, schema migrations, and queries for the
//! three reference stores (baseline, user imports, OCR scans), the
//! per-aircraft alert state, and the append-only audit log.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
