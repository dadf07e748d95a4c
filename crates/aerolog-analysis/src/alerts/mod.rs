//! Alert state lifecycle: detection runs, reviews, audit trail.

pub mod manager;

pub use manager::{
    AlertStateManager, DetectionOutcome, DetectionSummary, DetectionTarget, ReviewOutcome,
};
