//! Report-type classification from OCR text.

pub mod classifier;
pub mod normalize;
pub mod scorer;
pub mod table;

pub use classifier::{ReportClassification, ReportClassifier, SecondaryCandidate};
pub use scorer::{CategoryMatch, PatternScorer};
pub use table::{PatternSpec, PatternTable};
