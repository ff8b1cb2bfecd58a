//! Store-bound ingestion runs.
//!
//! A run touches the store exactly twice: one read of the collection at the
//! start, one batch insert at the end. The insert is the commit point. A
//! [`PreparedBatch`] that is dropped instead of committed leaves the store
//! untouched.
//!
//! Deduplication only sees the history read at run start. Two runs racing on
//! the same new code can both accept it; the store's uniqueness constraint
//! (if it has one) is the backstop and surfaces as
//! [`IngestError::Persistence`] on the losing commit.

use crate::error::IngestError;
use crate::pipeline::{ingest, IngestResult, IngestSummary};
use scoutflow_ids::IdGenerator;
use scoutflow_schema::Schema;
use scoutflow_store::{DocumentStore, StoredDocument};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_COLLECTION: &str = "raw_codes";
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Where runs read from and write to, and how long the store may take.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub collection: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl IngestConfig {
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }
}

/// A processed batch that has not been written yet.
#[derive(Debug, Clone)]
#[must_use = "a prepared batch is not persisted until it is committed"]
pub struct PreparedBatch {
    collection: String,
    result: IngestResult,
}

impl PreparedBatch {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn result(&self) -> &IngestResult {
        &self.result
    }

    pub fn summary(&self) -> IngestSummary {
        self.result.summary()
    }

    pub fn into_result(self) -> IngestResult {
        self.result
    }

    fn documents(&self) -> Vec<StoredDocument> {
        self.result
            .accepted
            .iter()
            .map(|record| record.to_document())
            .collect()
    }
}

/// Runs batches against one store, schema and collection.
pub struct Ingestor<S> {
    store: S,
    schema: Schema,
    config: IngestConfig,
    ids: IdGenerator,
}

impl<S: DocumentStore> Ingestor<S> {
    pub fn new(store: S, schema: Schema, config: IngestConfig) -> Self {
        Self {
            store,
            schema,
            config,
            ids: IdGenerator::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Raw texts already stored in the configured collection.
    pub async fn historical_texts(&self) -> Result<HashSet<String>, IngestError> {
        let collection = self.config.collection.as_str();
        let documents = tokio::time::timeout(self.config.read_timeout, self.store.find(collection))
            .await
            .map_err(|_| IngestError::Timeout {
                operation: "reading stored codes",
                after: self.config.read_timeout,
            })?
            .map_err(|source| IngestError::HistoryRead {
                collection: collection.to_string(),
                source,
            })?;

        Ok(documents.into_iter().map(|doc| doc.data).collect())
    }

    /// Read history and process the batch, without writing anything.
    pub async fn prepare<I, T>(&mut self, raw_codes: I) -> Result<PreparedBatch, IngestError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let historical = self.historical_texts().await?;
        let result = ingest(raw_codes, &self.schema, &historical, &mut self.ids)?;
        Ok(PreparedBatch {
            collection: self.config.collection.clone(),
            result,
        })
    }

    /// Write the accepted records in one insert. An empty batch never reaches the store.
    pub async fn commit(&self, batch: PreparedBatch) -> Result<IngestResult, IngestError> {
        if batch.result.accepted.is_empty() {
            info!(collection = %batch.collection, "No new codes to upload");
            return Ok(batch.result);
        }

        let documents = batch.documents();
        let write = self.store.insert_documents(&batch.collection, &documents);
        tokio::time::timeout(self.config.write_timeout, write)
            .await
            .map_err(|_| IngestError::Timeout {
                operation: "writing accepted codes",
                after: self.config.write_timeout,
            })?
            .map_err(|source| {
                warn!(collection = %batch.collection, error = %source, "Batch insert failed");
                IngestError::Persistence {
                    collection: batch.collection.clone(),
                    count: documents.len(),
                    source,
                }
            })?;

        info!(
            collection = %batch.collection,
            count = documents.len(),
            "Uploaded codes"
        );
        Ok(batch.result)
    }

    /// [`prepare`](Self::prepare) then [`commit`](Self::commit).
    pub async fn run<I, T>(&mut self, raw_codes: I) -> Result<IngestResult, IngestError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let batch = self.prepare(raw_codes).await?;
        self.commit(batch).await
    }
}
