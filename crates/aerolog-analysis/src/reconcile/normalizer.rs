//! AD/SB identifier normalization.
//!
//! References arrive formatted differently per source ("AD 2024-01",
//! "ad2024-01", "2024 / 01"); reconciliation joins on the normalized
//! form. Normalization is total: any input produces an identifier,
//! and malformed references reconcile as unmatched rather than failing.

use aerolog_core::types::{ReferenceIdentifier, ReferenceKind};

/// Normalize a raw identifier string into its canonical form.
///
/// Uppercase, trim, collapse runs of whitespace/hyphen/slash between
/// groups into a single hyphen, then strip leading `AD`/`SB`/`CF`
/// marker tokens, recording the first as the kind (`CF` is the
/// Transport Canada AD numbering prefix). The kind falls back to the
/// hint, then to `Ad`.
///
/// Idempotent: re-normalizing a normalized form (with the recorded
/// kind as hint) yields the same identifier.
pub fn normalize(raw: &str, kind_hint: Option<ReferenceKind>) -> ReferenceIdentifier {
    let collapsed = collapse_separators(raw);

    let mut rest = collapsed.as_str();
    let mut marker_kind: Option<ReferenceKind> = None;
    loop {
        match strip_marker(rest) {
            Some((kind, stripped)) => {
                if marker_kind.is_none() {
                    marker_kind = Some(kind);
                }
                rest = stripped;
            }
            None => break,
        }
    }

    ReferenceIdentifier {
        raw: raw.to_string(),
        normalized: rest.to_string(),
        kind: marker_kind.or(kind_hint).unwrap_or(ReferenceKind::Ad),
    }
}

/// Uppercase and collapse separator runs to single hyphens.
fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars().flat_map(char::to_uppercase) {
        if c.is_whitespace() || c == '-' || c == '/' {
            pending_sep = true;
        } else {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        }
    }
    out
}

/// Strip one leading marker token, if doing so leaves a remainder.
///
/// A marker is `AD`/`SB`/`CF` followed by a hyphen or a digit (so
/// `ADIRU-1` or a bare `AD` stay untouched).
fn strip_marker(s: &str) -> Option<(ReferenceKind, &str)> {
    for (token, kind) in [
        ("AD", ReferenceKind::Ad),
        ("SB", ReferenceKind::Sb),
        ("CF", ReferenceKind::Ad),
    ] {
        if let Some(rest) = s.strip_prefix(token) {
            let rest = rest.strip_prefix('-').unwrap_or(rest);
            if !rest.is_empty() && rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return Some((kind, rest));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_formats_converge() {
        let canonical = normalize("AD-2024-01", None);
        assert_eq!(canonical.normalized, "2024-01");
        assert_eq!(canonical.kind, ReferenceKind::Ad);

        for raw in ["ad 2024-01", "AD2024-01", "ad / 2024 / 01", "  Ad-2024 01 "] {
            assert_eq!(normalize(raw, None), canonical, "raw: {raw:?}");
        }
    }

    #[test]
    fn test_sb_marker_recorded() {
        let id = normalize("sb 172-001", None);
        assert_eq!(id.kind, ReferenceKind::Sb);
        assert_eq!(id.normalized, "172-001");
    }

    #[test]
    fn test_cf_prefix_is_ad_numbering() {
        let cf = normalize("CF-2020-01", None);
        assert_eq!(cf.kind, ReferenceKind::Ad);
        assert_eq!(cf, normalize("ad 2020-01", None));
    }

    #[test]
    fn test_hint_applies_only_without_marker() {
        assert_eq!(normalize("172-001", Some(ReferenceKind::Sb)).kind, ReferenceKind::Sb);
        assert_eq!(normalize("AD-172-001", Some(ReferenceKind::Sb)).kind, ReferenceKind::Ad);
    }

    #[test]
    fn test_marker_needs_a_remainder() {
        assert_eq!(normalize("AD", None).normalized, "AD");
        assert_eq!(normalize("AD-", None).normalized, "AD");
    }

    #[test]
    fn test_non_numeric_prefix_is_not_a_marker() {
        assert_eq!(normalize("ADIRU-1", None).normalized, "ADIRU-1");
        assert_eq!(normalize("SIL-2020-01", Some(ReferenceKind::Sb)).normalized, "SIL-2020-01");
    }

    #[test]
    fn test_malformed_input_is_total() {
        assert_eq!(normalize("", None).normalized, "");
        assert_eq!(normalize("???", None).normalized, "???");
        assert_eq!(normalize(" - / - ", None).normalized, "");
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(raw in ".{0,40}") {
            let once = normalize(&raw, None);
            let twice = normalize(&once.normalized, Some(once.kind));
            prop_assert_eq!(&twice.normalized, &once.normalized);
            prop_assert_eq!(twice.kind, once.kind);
        }

        #[test]
        fn prop_separator_variants_compare_equal(
            year in 1990u32..2030,
            num in 1u32..999,
        ) {
            let a = normalize(&format!("AD-{year}-{num:02}"), None);
            let b = normalize(&format!("ad {year} {num:02}"), None);
            let c = normalize(&format!("AD{year}-{num:02}"), None);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(&a, &c);
        }
    }
}
