//! Deduplication engine.
//!
//! Duplicate means byte-equal raw text. No trimming, no case folding.

use crate::record::{ClassifiedRecord, Rejection};
use std::collections::HashSet;

/// The set of raw texts a run has already seen: the historical texts read
/// from the store at run start, plus every text accepted so far this run.
#[derive(Debug)]
pub struct DedupSet<'h> {
    historical: &'h HashSet<String>,
    accepted: HashSet<String>,
}

impl<'h> DedupSet<'h> {
    pub fn new(historical: &'h HashSet<String>) -> Self {
        Self {
            historical,
            accepted: HashSet::new(),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, raw: &str) -> bool {
        self.historical.contains(raw) || self.accepted.contains(raw)
    }

    /// Record `raw` as seen. Returns `false` if it had been seen already.
    pub fn admit(&mut self, raw: &str) -> bool {
        if self.historical.contains(raw) {
            return false;
        }
        self.accepted.insert(raw.to_string())
    }

    /// Texts admitted during this run.
    #[cfg(test)]
    pub fn admitted(&self) -> usize {
        self.accepted.len()
    }
}

/// Result of deduplicating one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    pub accepted: Vec<ClassifiedRecord>,
    pub duplicates: Vec<Rejection>,
}

/// Partition `batch` into first occurrences and duplicates, in batch order.
pub fn deduplicate(batch: Vec<ClassifiedRecord>, historical: &HashSet<String>) -> DedupOutcome {
    let mut seen = DedupSet::new(historical);
    let mut outcome = DedupOutcome::default();

    for record in batch {
        if seen.admit(&record.raw) {
            outcome.accepted.push(record);
        } else {
            outcome.duplicates.push(Rejection::duplicate(record.raw));
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RejectionReason;
    use proptest::prelude::*;

    fn batch(raws: &[&str]) -> Vec<ClassifiedRecord> {
        raws.iter()
            .map(|raw| ClassifiedRecord::new(*raw, "kind"))
            .collect()
    }

    fn history(raws: &[&str]) -> HashSet<String> {
        raws.iter().map(|raw| raw.to_string()).collect()
    }

    fn raws(records: &[ClassifiedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.raw.as_str()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let outcome = deduplicate(batch(&["*abc", "*abc", "+xyz"]), &HashSet::new());
        assert_eq!(raws(&outcome.accepted), vec!["*abc", "+xyz"]);
        assert_eq!(outcome.duplicates, vec![Rejection::duplicate("*abc")]);
    }

    #[test]
    fn test_historical_text_is_rejected() {
        let outcome = deduplicate(batch(&["*abc"]), &history(&["*abc"]));
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.duplicates[0].reason, RejectionReason::Duplicate);
    }

    #[test]
    fn test_exact_match_only() {
        let outcome = deduplicate(batch(&["*abc", "*abc ", "*ABC"]), &history(&[" *abc"]));
        assert_eq!(outcome.accepted.len(), 3);
        assert!(outcome.duplicates.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let outcome = deduplicate(Vec::new(), &history(&["*abc"]));
        assert_eq!(outcome, DedupOutcome::default());
    }

    #[test]
    fn test_dedup_set_tracks_admissions() {
        let historical = history(&["*old"]);
        let mut seen = DedupSet::new(&historical);
        assert!(seen.contains("*old"));
        assert!(!seen.admit("*old"));
        assert!(seen.admit("*new"));
        assert!(!seen.admit("*new"));
        assert!(seen.contains("*new"));
        assert_eq!(seen.admitted(), 1);
    }

    proptest! {
        #[test]
        fn prop_dedup_invariants(
            codes in proptest::collection::vec("[*+][ab]{1,2}", 0..24),
            historical in proptest::collection::hash_set("[*+][ab]{1,2}", 0..4),
        ) {
            let input = batch(&codes.iter().map(String::as_str).collect::<Vec<_>>());
            let outcome = deduplicate(input, &historical);

            prop_assert_eq!(outcome.accepted.len() + outcome.duplicates.len(), codes.len());

            let mut unique = HashSet::new();
            for record in &outcome.accepted {
                prop_assert!(unique.insert(record.raw.clone()));
                prop_assert!(!historical.contains(&record.raw));
            }

            // Survivors are exactly the first occurrences, in batch order.
            let mut expected = Vec::new();
            let mut seen = historical.clone();
            for code in &codes {
                if seen.insert(code.clone()) {
                    expected.push(code.as_str());
                }
            }
            prop_assert_eq!(raws(&outcome.accepted), expected);
        }
    }
}
