//! Ingestion pipeline for scanned codes
//!
//! One run takes an ordered batch of raw codes and, strictly in order:
//!
//! 1. **Classifies** every code against the [`Schema`] (start character).
//! 2. **Deduplicates** the recognized codes against everything already stored
//!    and against earlier codes in the same batch. The first occurrence wins.
//! 3. **Assigns** each survivor a time-sortable [`RecordId`] and a readable
//!    timestamp derived from it.
//! 4. **Persists** the accepted batch with a single insert, and only when
//!    there is something to insert.
//!
//! Per-code problems (unrecognized kind, duplicate) are values in the
//! [`IngestResult`], never errors, so one bad scan cannot sink a batch.
//!
//! [`ingest`] is the pure core. [`Ingestor`] wraps it with the two store
//! boundary calls and their timeouts.

pub mod assign;
pub mod dedup;
pub mod error;
pub mod ingestor;
pub mod pipeline;
pub mod record;

pub use assign::assign;
pub use dedup::{deduplicate, DedupOutcome, DedupSet};
pub use error::IngestError;
pub use ingestor::{IngestConfig, Ingestor, PreparedBatch, DEFAULT_COLLECTION};
pub use pipeline::{ingest, IngestResult, IngestSummary};
pub use record::{AcceptedRecord, ClassifiedRecord, Rejection, RejectionReason};

pub use scoutflow_ids::{IdGenerator, RecordId};
pub use scoutflow_schema::{Schema, SchemaError};
