//! Identifier assignment.

use crate::record::{AcceptedRecord, ClassifiedRecord};
use scoutflow_ids::IdGenerator;

/// Stamp every record with a fresh id, in input order.
///
/// Ids come from one monotonic generator, so a record assigned earlier always
/// compares below a record assigned later.
pub fn assign(records: Vec<ClassifiedRecord>, ids: &mut IdGenerator) -> Vec<AcceptedRecord> {
    records
        .into_iter()
        .map(|record| {
            let id = ids.next_id();
            AcceptedRecord {
                raw: record.raw,
                kind: record.kind,
                readable_time: id.readable_time(),
                id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let records: Vec<ClassifiedRecord> = (0..500)
            .map(|i| ClassifiedRecord::new(format!("*{}", i), "subjective"))
            .collect();
        let mut ids = IdGenerator::new();
        let accepted = assign(records, &mut ids);

        assert_eq!(accepted.len(), 500);
        assert!(accepted.windows(2).all(|w| w[0].id < w[1].id));
        let unique: HashSet<_> = accepted.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), 500);
        assert_eq!(accepted[0].raw, "*0");
    }

    #[test]
    fn test_readable_time_matches_id() {
        let mut ids = IdGenerator::new();
        let accepted = assign(vec![ClassifiedRecord::new("+x", "objective")], &mut ids);
        assert_eq!(accepted[0].readable_time, accepted[0].id.readable_time());
    }

    #[test]
    fn test_ids_keep_increasing_across_calls() {
        let mut ids = IdGenerator::new();
        let first = assign(vec![ClassifiedRecord::new("+a", "objective")], &mut ids);
        let second = assign(vec![ClassifiedRecord::new("+b", "objective")], &mut ids);
        assert!(first[0].id < second[0].id);
    }
}
