//! AD/SB reference extraction from free text.
//!
//! Used for user-imported PDF text and OCR output alike: the caller
//! hands over extracted text, this module finds identifier-shaped
//! references in Transport Canada formats and sniffs a title and scope
//! from the surrounding context.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use aerolog_core::types::collections::FxHashSet;
use aerolog_core::types::{ReferenceIdentifier, ReferenceKind};

use super::normalizer::normalize;

/// Scope of a reference, detected from context keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceScope {
    Airframe,
    Engine,
    Propeller,
    Appliance,
    Unspecified,
}

/// One reference found in text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedReference {
    pub identifier: ReferenceIdentifier,
    pub title: Option<String>,
    pub scope: ReferenceScope,
    /// Surrounding context, bounded for storage.
    pub context: String,
}

/// Transport Canada AD identifier formats.
const AD_PATTERNS: &[&str] = &[
    r"CF[-\s]?\d{4}[-\s]?\d{1,3}[A-Z]?",
    r"AD[-\s]?\d{4}[-\s]?\d{1,4}",
    r"FAA[-\s]AD[-\s]?\d{4}[-\s]?\d{1,4}[-\s]?\d*",
];

/// Service bulletin and related letter formats.
const SB_PATTERNS: &[&str] = &[
    r"SB[-\s]?\d{2,4}[-\s]?\d{1,4}[-\s]?\d{0,2}",
    r"SIL[-\s]?\d{2,4}[-\s]?\d{1,4}",
    r"SEL[-\s]?\d{2,4}[-\s]?\d{1,4}",
];

const SCOPE_KEYWORDS: &[(ReferenceScope, &[&str])] = &[
    (ReferenceScope::Engine, &["engine", "moteur", "powerplant", "turbine", "piston"]),
    (ReferenceScope::Propeller, &["propeller", "hélice", "helice", "prop ", "blade"]),
    (ReferenceScope::Airframe, &["airframe", "fuselage", "wing", "aile", "structure", "landing gear"]),
    (ReferenceScope::Appliance, &["appliance", "equipment", "instrument", "avionics"]),
];

const CONTEXT_BEFORE: usize = 100;
const CONTEXT_AFTER: usize = 200;
const CONTEXT_STORED: usize = 300;

fn compiled(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("built-in extraction pattern must compile")
        })
        .collect()
}

fn ad_regexes() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| compiled(AD_PATTERNS))
}

fn sb_regexes() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| compiled(SB_PATTERNS))
}

/// Extract unique AD/SB references from free text.
///
/// Duplicates (by normalized identifier) are dropped; the first
/// occurrence wins and supplies the context.
pub fn extract_references(text: &str) -> Vec<ExtractedReference> {
    let mut seen: FxHashSet<ReferenceIdentifier> = FxHashSet::default();
    let mut references = Vec::new();

    let passes = [
        (ad_regexes(), ReferenceKind::Ad),
        (sb_regexes(), ReferenceKind::Sb),
    ];

    for (regexes, kind) in passes {
        for regex in regexes {
            for m in regex.find_iter(text) {
                let identifier = normalize(m.as_str(), Some(kind));
                if identifier.normalized.is_empty() || !seen.insert(identifier.clone()) {
                    continue;
                }

                let context = surrounding_context(text, m.start(), m.end());
                references.push(ExtractedReference {
                    title: extract_title(&context, m.as_str()),
                    scope: detect_scope(&context),
                    context: cap_chars(&context, CONTEXT_STORED),
                    identifier,
                });
            }
        }
    }

    debug!(count = references.len(), "extracted references from text");
    references
}

fn surrounding_context(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_BEFORE);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_AFTER).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].to_string()
}

/// Try to pull a title out of the context: "CF-2020-01: Title Here" or
/// a Subject/Objet line.
fn extract_title(context: &str, matched: &str) -> Option<String> {
    static SUBJECT: OnceLock<Regex> = OnceLock::new();
    let subject = SUBJECT.get_or_init(|| {
        RegexBuilder::new(r"(?:Subject|Title|Objet)\s*:\s*([A-Za-z][^.\n]{10,100})")
            .case_insensitive(true)
            .build()
            .expect("built-in title pattern must compile")
    });

    let after_ref = RegexBuilder::new(&format!(
        r"{}\s*[:\u{{2013}}-]\s*([A-Za-z][^.\n]{{10,100}})",
        regex::escape(matched)
    ))
    .case_insensitive(true)
    .build()
    .ok()?;

    let captured = after_ref
        .captures(context)
        .or_else(|| subject.captures(context))?;

    let title = captured.get(1)?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    Some(cap_chars(&title, 200))
}

fn detect_scope(context: &str) -> ReferenceScope {
    let lower = context.to_lowercase();
    for (scope, keywords) in SCOPE_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *scope;
        }
    }
    ReferenceScope::Unspecified
}

fn cap_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_tc_ad_formats() {
        let refs = extract_references("Compliance with CF-2020-01 and AD 2021-0034 recorded.");
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.identifier.kind == ReferenceKind::Ad));
        assert_eq!(refs[0].identifier.normalized, "2020-01");
    }

    #[test]
    fn test_extracts_service_bulletins() {
        let refs = extract_references("Incorporated SB-172-001 at this visit.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].identifier.kind, ReferenceKind::Sb);
        assert_eq!(refs[0].identifier.normalized, "172-001");
    }

    #[test]
    fn test_duplicates_collapse_to_one() {
        let refs = extract_references("CF-2020-01 noted. cf 2020-01 complied. CF-2020-01 again.");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_scope_from_context() {
        let refs = extract_references("Engine mount corrosion, see CF-2019-33 for details.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].scope, ReferenceScope::Engine);
    }

    #[test]
    fn test_title_after_reference() {
        let refs =
            extract_references("CF-2020-01: Wing strut attachment inspection requirement text.");
        assert_eq!(refs.len(), 1);
        let title = refs[0].title.as_deref().unwrap();
        assert!(title.starts_with("Wing strut attachment"));
    }

    #[test]
    fn test_no_references_in_plain_text() {
        assert!(extract_references("Oil changed, run-up normal.").is_empty());
    }
}
