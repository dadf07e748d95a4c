//! Set reconciliation across baseline, user-imported, and OCR
//! reference sets for one aircraft.
//!
//! All functions are pure: input record sets are never mutated, and
//! matching uses normalized-identifier equality only — document
//! content is never compared. An empty baseline is a valid state, not
//! an error: every count is zero and no alert is raised.

use chrono::{DateTime, Utc};

use aerolog_core::types::collections::{FxHashMap, FxHashSet};
use aerolog_core::types::{ReferenceIdentifier, ReferenceRecord};

use super::views::{BaselineEntry, BaselineView, ImportEntry, ImportView, NewItemsDelta};

/// Aggregated OCR occurrences for one normalized identifier.
struct ScanAggregate {
    count: u32,
    last_seen: Option<DateTime<Utc>>,
}

/// Collapse OCR records by normalized identifier: occurrence counts
/// sum, the most recent scan date wins.
fn aggregate_scans(ocr: &[ReferenceRecord]) -> FxHashMap<ReferenceIdentifier, ScanAggregate> {
    let mut by_identifier: FxHashMap<ReferenceIdentifier, ScanAggregate> = FxHashMap::default();
    for record in ocr {
        let entry = by_identifier
            .entry(record.identifier.clone())
            .or_insert(ScanAggregate {
                count: 0,
                last_seen: None,
            });
        entry.count += record.occurrence_count;
        entry.last_seen = match (entry.last_seen, record.last_seen_date) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
    by_identifier
}

/// Unique identifiers of a record set, in first-seen order.
pub fn unique_identifiers(records: &[ReferenceRecord]) -> Vec<ReferenceIdentifier> {
    let mut seen: FxHashSet<ReferenceIdentifier> = FxHashSet::default();
    let mut unique = Vec::new();
    for record in records {
        if seen.insert(record.identifier.clone()) {
            unique.push(record.identifier.clone());
        }
    }
    unique
}

/// OCR-vs-baseline: for each baseline reference, was it ever seen in
/// the aircraft's scans?
pub fn baseline_view(baseline: &[ReferenceRecord], ocr: &[ReferenceRecord]) -> BaselineView {
    let scans = aggregate_scans(ocr);

    let entries: Vec<BaselineEntry> = unique_identifiers(baseline)
        .into_iter()
        .map(|identifier| {
            let aggregate = scans.get(&identifier);
            BaselineEntry {
                seen: aggregate.is_some(),
                occurrence_count: aggregate.map_or(0, |a| a.count),
                last_seen_date: aggregate.and_then(|a| a.last_seen),
                identifier,
            }
        })
        .collect();

    let seen_count = entries.iter().filter(|e| e.seen).count();
    BaselineView {
        total: entries.len(),
        seen_count,
        not_seen_count: entries.len() - seen_count,
        entries,
    }
}

/// OCR-vs-user-imports: analogous, per imported reference.
pub fn import_view(imports: &[ReferenceRecord], ocr: &[ReferenceRecord]) -> ImportView {
    let scans = aggregate_scans(ocr);

    let entries: Vec<ImportEntry> = unique_identifiers(imports)
        .into_iter()
        .map(|identifier| {
            let aggregate = scans.get(&identifier);
            ImportEntry {
                seen_in_scans: aggregate.is_some(),
                scan_count: aggregate.map_or(0, |a| a.count),
                last_scan_date: aggregate.and_then(|a| a.last_seen),
                identifier,
            }
        })
        .collect();

    let seen_count = entries.iter().filter(|e| e.seen_in_scans).count();
    ImportView {
        total: entries.len(),
        seen_count,
        not_seen_count: entries.len() - seen_count,
        entries,
    }
}

/// Baseline references whose identifier is not in the stored snapshot
/// of previously-known references. Sorted for deterministic output.
pub fn new_since_snapshot(
    baseline: &[ReferenceRecord],
    snapshot: &[ReferenceIdentifier],
) -> NewItemsDelta {
    let known: FxHashSet<&ReferenceIdentifier> = snapshot.iter().collect();

    let mut refs: Vec<ReferenceIdentifier> = unique_identifiers(baseline)
        .into_iter()
        .filter(|identifier| !known.contains(identifier))
        .collect();
    refs.sort_by(|a, b| a.normalized.cmp(&b.normalized).then(a.kind.name().cmp(b.kind.name())));

    NewItemsDelta {
        count: refs.len(),
        refs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::normalizer::normalize;
    use aerolog_core::types::ReferenceOrigin;
    use chrono::TimeZone;

    fn record(raw: &str, origin: ReferenceOrigin) -> ReferenceRecord {
        ReferenceRecord::new(normalize(raw, None), origin, "subject")
    }

    fn scan(raw: &str, count: u32, day: u32) -> ReferenceRecord {
        let mut r = record(raw, ReferenceOrigin::OcrScan);
        r.occurrence_count = count;
        r.last_seen_date = Some(Utc.with_ymd_and_hms(2026, 6, day, 0, 0, 0).unwrap());
        r
    }

    #[test]
    fn test_baseline_matching_ignores_source_formatting() {
        let baseline = vec![
            record("AD-2024-01", ReferenceOrigin::TcBaseline),
            record("AD-2024-02", ReferenceOrigin::TcBaseline),
        ];
        let ocr = vec![scan("ad 2024-01", 1, 10)];

        let view = baseline_view(&baseline, &ocr);
        assert_eq!(view.total, 2);
        assert_eq!(view.seen_count, 1);
        assert_eq!(view.not_seen_count, 1);

        let seen_entry = view.entries.iter().find(|e| e.seen).unwrap();
        assert_eq!(seen_entry.identifier.normalized, "2024-01");
        assert_eq!(seen_entry.occurrence_count, 1);
    }

    #[test]
    fn test_duplicate_scans_aggregate_not_duplicate() {
        let baseline = vec![record("AD-2024-01", ReferenceOrigin::TcBaseline)];
        let ocr = vec![
            scan("AD-2024-01", 2, 10),
            scan("ad 2024 01", 1, 15),
        ];

        let view = baseline_view(&baseline, &ocr);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].occurrence_count, 3);
        assert_eq!(
            view.entries[0].last_seen_date,
            Some(Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_baseline_is_valid() {
        let view = baseline_view(&[], &[scan("AD-2024-01", 1, 10)]);
        assert_eq!(view.total, 0);
        assert_eq!(view.seen_count, 0);
        assert_eq!(view.not_seen_count, 0);
        assert!(view.entries.is_empty());
    }

    #[test]
    fn test_import_view_fields() {
        let imports = vec![record("CF-2018-22", ReferenceOrigin::UserImportedReference)];
        let ocr = vec![scan("cf 2018-22", 4, 20)];

        let view = import_view(&imports, &ocr);
        assert_eq!(view.total, 1);
        assert_eq!(view.seen_count, 1);
        assert!(view.entries[0].seen_in_scans);
        assert_eq!(view.entries[0].scan_count, 4);
        assert!(view.entries[0].last_scan_date.is_some());
    }

    #[test]
    fn test_new_since_snapshot_diff() {
        let baseline = vec![
            record("AD-2024-01", ReferenceOrigin::TcBaseline),
            record("AD-2024-02", ReferenceOrigin::TcBaseline),
            record("SB-172-001", ReferenceOrigin::TcBaseline),
        ];
        let snapshot = vec![normalize("AD-2024-01", None)];

        let delta = new_since_snapshot(&baseline, &snapshot);
        assert_eq!(delta.count, 2);
        assert_eq!(delta.refs[0].normalized, "172-001");
        assert_eq!(delta.refs[1].normalized, "2024-02");
    }

    #[test]
    fn test_new_since_empty_snapshot_is_whole_baseline() {
        let baseline = vec![record("AD-2024-01", ReferenceOrigin::TcBaseline)];
        let delta = new_since_snapshot(&baseline, &[]);
        assert_eq!(delta.count, 1);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let baseline = vec![record("AD-2024-01", ReferenceOrigin::TcBaseline)];
        let ocr = vec![scan("AD-2024-01", 1, 10)];
        let baseline_before = baseline.clone();
        let ocr_before = ocr.clone();

        let _ = baseline_view(&baseline, &ocr);
        let _ = new_since_snapshot(&baseline, &[]);

        assert_eq!(baseline, baseline_before);
        assert_eq!(ocr, ocr_before);
    }

    #[test]
    fn test_conservation_across_random_overlaps() {
        // Conservation: seen + not_seen == total for every subset split
        let all: Vec<ReferenceRecord> = (0..12)
            .map(|i| record(&format!("AD-2024-{i:02}"), ReferenceOrigin::TcBaseline))
            .collect();
        for split in 0..all.len() {
            let ocr: Vec<ReferenceRecord> = all[..split]
                .iter()
                .map(|r| scan(&r.identifier.raw, 1, 1))
                .collect();
            let view = baseline_view(&all, &ocr);
            assert_eq!(view.seen_count + view.not_seen_count, view.total);
            assert_eq!(view.seen_count, split);
        }
    }
}
