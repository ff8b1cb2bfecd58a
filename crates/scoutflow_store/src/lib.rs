//! Document store collaborators for scoutflow
//!
//! The ingestion pipeline talks to persistence through exactly two calls:
//! read everything already stored in a collection, and insert one batch.
//! [`DocumentStore`] is that seam. Two implementations ship here:
//!
//! - [`SqliteStore`]: durable store on a local SQLite file. Enforces
//!   uniqueness of raw text per collection at write time.
//! - [`MemoryStore`]: in-process store for tests and dry runs.

mod document;
mod error;
mod memory;
mod sqlite;

pub use document::StoredDocument;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;

/// Generic find/insert interface over named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents stored in `collection`, oldest first. An unknown
    /// collection yields an empty list, not an error.
    async fn find(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Insert `documents` into `collection`. All-or-nothing.
    async fn insert_documents(&self, collection: &str, documents: &[StoredDocument]) -> Result<()>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn find(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        (**self).find(collection).await
    }

    async fn insert_documents(&self, collection: &str, documents: &[StoredDocument]) -> Result<()> {
        (**self).insert_documents(collection, documents).await
    }
}
