//! Error taxonomy shared across aerolog crates.
//!
//! Absence of data (empty text, unknown designator) is a normal business
//! state and is NOT represented here — those paths return degraded results.

use thiserror::Error;

/// Configuration failures. Fatal at process start: a broken pattern table
/// must never produce silently-wrong classifications at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pattern `{pattern}` for category {category} does not compile: {message}")]
    InvalidPattern {
        category: String,
        pattern: String,
        message: String,
    },

    #[error("category {category} has no patterns")]
    EmptyCategory { category: String },

    #[error("category {category} has no high-confidence anchor pattern")]
    MissingAnchor { category: String },

    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("failed to read configuration file: {message}")]
    Io { message: String },
}

/// Alert-state failures surfaced by detection and review operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// Another detection or review is mutating this aircraft's alert state.
    /// Retryable: detection runs are idempotent and safe to repeat.
    #[error("alert state for aircraft {aircraft_id} is busy")]
    Conflict { aircraft_id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persistence-layer failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("invalid stored value: {message}")]
    InvalidRow { message: String },
}
