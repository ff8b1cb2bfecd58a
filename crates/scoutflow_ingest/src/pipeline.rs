//! The pure ingestion core: classify, deduplicate, assign.

use crate::assign::assign;
use crate::dedup::deduplicate;
use crate::record::{AcceptedRecord, ClassifiedRecord, Rejection};
use scoutflow_ids::IdGenerator;
use scoutflow_schema::{classify, Classification, Schema, SchemaError};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Everything one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestResult {
    pub accepted: Vec<AcceptedRecord>,
    pub rejected_unrecognized: Vec<Rejection>,
    pub rejected_duplicate: Vec<Rejection>,
}

/// The three numbers every run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected_unrecognized: usize,
    pub rejected_duplicate: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected_unrecognized + self.rejected_duplicate
    }
}

impl IngestResult {
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            accepted: self.accepted.len(),
            rejected_unrecognized: self.rejected_unrecognized.len(),
            rejected_duplicate: self.rejected_duplicate.len(),
        }
    }

    /// Raw texts of accepted records, in acceptance order.
    pub fn accepted_raw(&self) -> Vec<&str> {
        self.accepted.iter().map(|r| r.raw.as_str()).collect()
    }

    /// All rejections, unrecognized first.
    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.rejected_unrecognized
            .iter()
            .chain(self.rejected_duplicate.iter())
    }
}

/// Run one batch through classification, deduplication and id assignment.
///
/// `historical` is the set of raw texts already persisted; an empty set just
/// means nothing has been stored yet. Unrecognized codes never reach
/// deduplication, so the two rejection buckets never overlap.
///
/// Fails only if the schema turns out to be ambiguous for some code.
pub fn ingest<I, S>(
    raw_codes: I,
    schema: &Schema,
    historical: &HashSet<String>,
    ids: &mut IdGenerator,
) -> Result<IngestResult, SchemaError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut recognized = Vec::new();
    let mut rejected_unrecognized = Vec::new();

    for raw in raw_codes {
        let raw: String = raw.into();
        let kind = match classify(&raw, schema)? {
            Classification::Recognized { kind, .. } => Some(kind.name().to_string()),
            Classification::Unrecognized => None,
        };
        match kind {
            Some(kind) => recognized.push(ClassifiedRecord { raw, kind }),
            None => {
                warn!(raw = %raw, "Unrecognized code: no record kind starts with its first character");
                rejected_unrecognized.push(Rejection::unrecognized(raw));
            }
        }
    }

    let outcome = deduplicate(recognized, historical);
    if !outcome.duplicates.is_empty() {
        info!("{} duplicate codes not uploaded", outcome.duplicates.len());
        for dup in &outcome.duplicates {
            debug!(raw = %dup.raw, "Duplicate code");
        }
    }

    let accepted = assign(outcome.accepted, ids);

    let result = IngestResult {
        accepted,
        rejected_unrecognized,
        rejected_duplicate: outcome.duplicates,
    };
    let summary = result.summary();
    info!(
        accepted = summary.accepted,
        unrecognized = summary.rejected_unrecognized,
        duplicates = summary.rejected_duplicate,
        "Ingestion batch processed"
    );
    Ok(result)
}
