//! Bilingual weighted pattern scoring over normalized OCR text.

use serde::{Deserialize, Serialize};

use aerolog_core::config::ClassifierConfig;
use aerolog_core::types::{PatternLanguage, ReportCategory};

use super::table::PatternTable;

/// One scoring hit: a pattern matched somewhere in the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub category: ReportCategory,
    pub weight: u32,
    /// What matched, as a human-readable label from the pattern table.
    pub label: String,
    /// Surrounding text, centered on the match, bounded in length.
    pub snippet: String,
    pub language: PatternLanguage,
}

/// A raw hit with its span, before overlap suppression.
struct RawHit {
    start: usize,
    end: usize,
    weight: u32,
    label: String,
    language: PatternLanguage,
}

/// Scores normalized text against the pattern table.
///
/// Pure function of (text, table): no side effects, no state. Multiple
/// distinct hits within one category accumulate, so repeated strong
/// evidence raises the category score monotonically.
pub struct PatternScorer {
    table: PatternTable,
    snippet_max_chars: usize,
}

impl PatternScorer {
    pub fn new(table: PatternTable, config: &ClassifierConfig) -> Self {
        Self {
            table,
            snippet_max_chars: config.snippet_max_chars,
        }
    }

    /// Score text that has already been through `normalize_text`.
    ///
    /// Within a category, hits whose spans overlap a heavier hit are
    /// suppressed so nested patterns ("625 APPENDIX B" inside a bare
    /// "APPENDIX B" rule) count once.
    pub fn score_normalized(&self, normalized: &str) -> Vec<CategoryMatch> {
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();

        for (category, patterns) in self.table.categories() {
            let mut hits: Vec<RawHit> = Vec::new();
            for pattern in patterns {
                for m in pattern.regex.find_iter(normalized) {
                    hits.push(RawHit {
                        start: m.start(),
                        end: m.end(),
                        weight: pattern.weight,
                        label: pattern.label.clone(),
                        language: pattern.language,
                    });
                }
            }

            for hit in suppress_overlaps(hits) {
                let snippet =
                    extract_snippet(normalized, hit.start, hit.end, self.snippet_max_chars);
                matches.push(CategoryMatch {
                    category,
                    weight: hit.weight,
                    label: hit.label,
                    snippet,
                    language: hit.language,
                });
            }
        }

        matches
    }
}

/// Keep, per category, the heaviest non-overlapping hits.
/// Ties prefer the longer, then earlier, span.
fn suppress_overlaps(mut hits: Vec<RawHit>) -> Vec<RawHit> {
    hits.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.start.cmp(&b.start))
    });

    let mut kept: Vec<RawHit> = Vec::with_capacity(hits.len());
    for hit in hits {
        if kept.iter().all(|k| hit.end <= k.start || hit.start >= k.end) {
            kept.push(hit);
        }
    }
    kept.sort_by_key(|h| h.start);
    kept
}

/// Extract a snippet around a match, capped at `max_chars`, with
/// ellipses where the surrounding text was cut.
fn extract_snippet(text: &str, start: usize, end: usize, max_chars: usize) -> String {
    const CONTEXT: usize = 30;

    let from = floor_char_boundary(text, start.saturating_sub(CONTEXT));
    let to = ceil_char_boundary(text, (end + CONTEXT).min(text.len()));

    let mut snippet = String::new();
    if from > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&text[from..to]);
    if to < text.len() {
        snippet.push_str("...");
    }

    if snippet.chars().count() > max_chars {
        let cut: String = snippet.chars().take(max_chars.saturating_sub(3)).collect();
        snippet = format!("{cut}...");
    }

    snippet
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::normalize::normalize_text;

    fn scorer() -> PatternScorer {
        let config = ClassifierConfig::default();
        PatternScorer::new(PatternTable::with_defaults(&config).unwrap(), &config)
    }

    #[test]
    fn test_empty_text_scores_nothing() {
        assert!(scorer().score_normalized("").is_empty());
    }

    #[test]
    fn test_single_category_hits_accumulate() {
        let text = normalize_text("Annual inspection per 625 Appendix B. All items checked.");
        let matches = scorer().score_normalized(&text);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.category == ReportCategory::InspectionAppB));
        let total: u32 = matches.iter().map(|m| m.weight).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn test_nested_pattern_counts_once() {
        // "TIME BETWEEN OVERHAUL" contains a match for the bare
        // overhaul anchor; the heavier span wins and counts once.
        let text = normalize_text("TIME BETWEEN OVERHAUL");
        let matches = scorer().score_normalized(&text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].weight, 10);
        assert_eq!(matches[0].category, ReportCategory::ComponentOverhaul);
    }

    #[test]
    fn test_french_text_matches_accent_free_rows() {
        let text = normalize_text("Inspection annuelle effectuée selon le RAC 625 Appendice B.");
        let matches = scorer().score_normalized(&text);
        assert!(matches
            .iter()
            .any(|m| m.language == PatternLanguage::Fr && m.weight == 10));
        assert!(matches.iter().any(|m| m.label == "inspection annuelle"));
    }

    #[test]
    fn test_snippet_is_bounded_and_centered() {
        let filler = "X".repeat(500);
        let text = normalize_text(&format!("{filler} COMPASS SWING {filler}"));
        let matches = scorer().score_normalized(&text);
        assert_eq!(matches.len(), 1);
        let snippet = &matches[0].snippet;
        assert!(snippet.chars().count() <= 120);
        assert!(snippet.contains("COMPASS SWING"));
        assert!(snippet.starts_with("...") && snippet.ends_with("..."));
    }

    #[test]
    fn test_repeated_evidence_increases_score() {
        let once = normalize_text("MAJOR REPAIR performed.");
        let twice = normalize_text("MAJOR REPAIR started. MAJOR REPAIR completed.");
        let sum = |text: &str| -> u32 {
            scorer()
                .score_normalized(text)
                .iter()
                .map(|m| m.weight)
                .sum()
        };
        assert!(sum(&twice) > sum(&once));
    }
}
