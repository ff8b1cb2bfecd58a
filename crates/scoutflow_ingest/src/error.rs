//! Run-level ingestion errors.
//!
//! Per-code rejections are not errors; see [`crate::Rejection`].

use scoutflow_schema::SchemaError;
use scoutflow_store::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to read stored codes from '{collection}': {source}")]
    HistoryRead {
        collection: String,
        #[source]
        source: StoreError,
    },

    /// Nothing was committed; the whole batch can be retried.
    #[error("Failed to persist {count} codes to '{collection}': {source}")]
    Persistence {
        collection: String,
        count: usize,
        #[source]
        source: StoreError,
    },

    #[error("Timed out after {after:?} while {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl IngestError {
    /// True when the store refused the batch because a code was already stored.
    pub fn is_duplicate_conflict(&self) -> bool {
        matches!(self, IngestError::Persistence { source, .. } if source.is_duplicate())
    }
}
