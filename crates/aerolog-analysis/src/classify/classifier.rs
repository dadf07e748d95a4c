//! Report classifier: grouping, tie-break, confidence, warnings.
//!
//! Output is a suggestion. It is computed once per OCR extraction,
//! attached to the extraction result, and never mutated afterward;
//! downstream consumers must confirm it before acting on it.

use serde::{Deserialize, Serialize};
use tracing::info;

use aerolog_core::config::ClassifierConfig;
use aerolog_core::errors::ConfigError;
use aerolog_core::types::collections::FxHashMap;
use aerolog_core::types::ReportCategory;

use super::normalize::normalize_text;
use super::scorer::{CategoryMatch, PatternScorer};
use super::table::PatternTable;

pub const WARN_NO_ANCHOR: &str = "no high-confidence anchor found";
pub const WARN_LOW_CONFIDENCE: &str = "low-confidence classification; manual review recommended";
pub const WARN_AMBIGUOUS: &str = "multiple report types matched with similar scores";
pub const WARN_SHORT_TEXT: &str = "limited text available for classification";

/// A non-primary category that also scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryCandidate {
    pub category: ReportCategory,
    pub score: u32,
}

/// Immutable classification result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportClassification {
    pub primary_category: ReportCategory,
    /// In [0.0, 1.0]; 0 exactly when the primary category scored 0.
    pub confidence: f64,
    pub evidence: Vec<CategoryMatch>,
    /// Other scored categories, descending by score.
    pub secondary_candidates: Vec<SecondaryCandidate>,
    pub warnings: Vec<String>,
}

/// Classifies OCR text into the report taxonomy.
pub struct ReportClassifier {
    scorer: PatternScorer,
    config: ClassifierConfig,
}

impl ReportClassifier {
    pub fn new(table: PatternTable, config: ClassifierConfig) -> Self {
        Self {
            scorer: PatternScorer::new(table, &config),
            config,
        }
    }

    /// Build a classifier over the built-in pattern table.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let config = ClassifierConfig::default();
        let table = PatternTable::with_defaults(&config)?;
        Ok(Self::new(table, config))
    }

    /// Classify raw OCR text. Never fails: malformed or empty input
    /// degrades to `Unknown` with confidence 0.
    pub fn classify(&self, text: &str) -> ReportClassification {
        let normalized = normalize_text(text);
        let matches = self.scorer.score_normalized(&normalized);

        let mut scores: FxHashMap<ReportCategory, u32> = FxHashMap::default();
        for m in &matches {
            *scores.entry(m.category).or_insert(0) += m.weight;
        }

        let mut ranked: Vec<(ReportCategory, u32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.priority().cmp(&b.0.priority())));

        let anchor_present = matches.iter().any(|m| m.weight >= self.config.anchor_weight);

        let (primary_category, primary_score) = match ranked.first() {
            Some(&(category, score)) if score > 0 && anchor_present => (category, score),
            _ => (ReportCategory::Unknown, 0),
        };

        let total: u32 = ranked.iter().map(|(_, s)| s).sum();
        let confidence = if primary_score == 0 {
            0.0
        } else {
            (primary_score as f64 / total as f64).clamp(0.0, 1.0)
        };

        let mut evidence: Vec<CategoryMatch> = if primary_category == ReportCategory::Unknown {
            // Nothing definitive; surface whatever weak hits there were
            matches.clone()
        } else {
            matches
                .iter()
                .filter(|m| m.category == primary_category)
                .cloned()
                .collect()
        };
        evidence.sort_by(|a, b| b.weight.cmp(&a.weight));

        let secondary_candidates: Vec<SecondaryCandidate> = ranked
            .iter()
            .filter(|(category, _)| *category != primary_category)
            .map(|&(category, score)| SecondaryCandidate { category, score })
            .collect();

        let mut warnings = Vec::new();
        if !anchor_present {
            warnings.push(WARN_NO_ANCHOR.to_string());
        }
        if primary_category != ReportCategory::Unknown {
            if confidence < self.config.low_confidence_warning {
                warnings.push(WARN_LOW_CONFIDENCE.to_string());
            }
            if let Some(&(_, runner_up)) = ranked.get(1) {
                if runner_up as f64 >= primary_score as f64 * self.config.ambiguity_ratio {
                    warnings.push(WARN_AMBIGUOUS.to_string());
                }
            }
            if normalized.chars().count() < self.config.short_text_chars {
                warnings.push(WARN_SHORT_TEXT.to_string());
            }
        }

        info!(
            category = %primary_category,
            confidence,
            score = primary_score,
            alternatives = secondary_candidates.len(),
            "report classification"
        );

        ReportClassification {
            primary_category,
            confidence,
            evidence,
            secondary_candidates,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ReportClassifier {
        ReportClassifier::with_defaults().unwrap()
    }

    #[test]
    fn test_single_category_text_has_full_confidence() {
        let result = classifier()
            .classify("ANNUAL INSPECTION completed per 625 APPENDIX B requirements.");
        assert_eq!(result.primary_category, ReportCategory::InspectionAppB);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.evidence.len(), 2);
        assert!(result.secondary_candidates.is_empty());
    }

    #[test]
    fn test_empty_input_degrades_to_unknown() {
        let result = classifier().classify("");
        assert_eq!(result.primary_category, ReportCategory::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.evidence.is_empty());
        assert_eq!(result.warnings, vec![WARN_NO_ANCHOR.to_string()]);
    }

    #[test]
    fn test_whitespace_input_degrades_to_unknown() {
        let result = classifier().classify("   \n\t ");
        assert_eq!(result.primary_category, ReportCategory::Unknown);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_no_anchor_yields_unknown_with_weak_evidence() {
        // "periodic inspection" scores 4 but no weight-10 anchor exists
        let result = classifier().classify("Periodic inspection of the aircraft.");
        assert_eq!(result.primary_category, ReportCategory::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.warnings.contains(&WARN_NO_ANCHOR.to_string()));
        assert!(!result.evidence.is_empty());
    }

    #[test]
    fn test_french_avionics_report() {
        let result = classifier().classify(
            "Vérification 24 mois effectuée selon CAR 571.10. Altimètre, \
             système statique et transpondeur vérifiés.",
        );
        assert_eq!(result.primary_category, ReportCategory::Avionics24Month);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_elt_report() {
        let result = classifier().classify(
            "ELT OPERATIONAL TEST performed per CAR 605.38 and STD 571 Appendix G. \
             406 MHz beacon functional.",
        );
        assert_eq!(result.primary_category, ReportCategory::EltInspection);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_noisy_ocr_still_classifies() {
        let result =
            classifier().classify("ANUAL INSPECTI0N per 625 APPENIDX B completed satisfactorily.");
        assert_eq!(result.primary_category, ReportCategory::InspectionAppB);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_mixed_categories_rank_secondaries() {
        let result = classifier().classify(
            "MAJOR REPAIR to right wing. Weight and balance amended; \
             empty weight recomputed after the repair.",
        );
        // Both Repair and WeightAndBalance score; the heavier one wins
        assert_ne!(result.primary_category, ReportCategory::Unknown);
        assert!(!result.secondary_candidates.is_empty());
        let secondary_scores: Vec<u32> =
            result.secondary_candidates.iter().map(|c| c.score).collect();
        let mut sorted = secondary_scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(secondary_scores, sorted);
    }

    #[test]
    fn test_tie_breaks_by_taxonomy_priority() {
        // Construct a dead tie: one anchor hit in each category
        let result = classifier().classify("COMPASS SWING and WEIGHT AND BALANCE performed.");
        assert_eq!(result.primary_category, ReportCategory::CompassSwing);
        assert!(result
            .warnings
            .contains(&WARN_AMBIGUOUS.to_string()));
    }

    #[test]
    fn test_confidence_bounds_over_varied_inputs() {
        let classifier = classifier();
        let texts = [
            "",
            "no aviation content at all",
            "ANNUAL INSPECTION 625 APPENDIX B",
            "COMPASS SWING DEVIATION CARD MAGNETIC COMPASS CHECK",
            "overhaul overhaul overhaul TSO-12 TBO",
            "MAJOR REPAIR 625 APPENDIX B ELT TEST 605.38 571.10",
        ];
        for text in texts {
            let result = classifier.classify(text);
            assert!((0.0..=1.0).contains(&result.confidence), "text: {text}");
            let unknown = result.primary_category == ReportCategory::Unknown;
            assert_eq!(result.confidence == 0.0, unknown, "text: {text}");
        }
    }
}
