//! Record types flowing through one ingestion run.

use scoutflow_ids::RecordId;
use scoutflow_store::StoredDocument;
use serde::Serialize;
use std::fmt;

/// A raw code whose record kind has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    pub raw: String,
    pub kind: String,
}

impl ClassifiedRecord {
    pub fn new(raw: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: kind.into(),
        }
    }
}

/// A classified record that survived deduplication and has been stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedRecord {
    pub raw: String,
    pub kind: String,
    pub id: RecordId,
    pub readable_time: String,
}

impl AcceptedRecord {
    /// The document handed to the store for this record.
    pub fn to_document(&self) -> StoredDocument {
        StoredDocument::new(self.raw.clone(), self.id.to_string(), self.readable_time.clone())
    }
}

/// Why a code was left out of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    /// No record kind starts with the code's first character.
    UnrecognizedKind,
    /// The exact text was already stored, or appeared earlier in the batch.
    Duplicate,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::UnrecognizedKind => "unrecognized-kind",
            RejectionReason::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected code, kept verbatim for reporting. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub raw: String,
    pub reason: RejectionReason,
}

impl Rejection {
    pub fn unrecognized(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: RejectionReason::UnrecognizedKind,
        }
    }

    pub fn duplicate(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: RejectionReason::Duplicate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_tags() {
        assert_eq!(RejectionReason::UnrecognizedKind.to_string(), "unrecognized-kind");
        assert_eq!(RejectionReason::Duplicate.as_str(), "duplicate");
    }

    #[test]
    fn test_to_document_defaults() {
        let id = RecordId::from_parts(1_700_000_000_000, 1);
        let record = AcceptedRecord {
            raw: "*abc".to_string(),
            kind: "subjective".to_string(),
            id,
            readable_time: id.readable_time(),
        };
        let doc = record.to_document();
        assert_eq!(doc.data, "*abc");
        assert_eq!(doc.id, id.to_string());
        assert_eq!(doc.readable_time, "2023-11-14 22:13:20.000");
        assert!(!doc.blocklisted);
        assert!(doc.override_fields.is_empty());
    }
}
