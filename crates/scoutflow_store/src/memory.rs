//! In-process document store.

use crate::{DocumentStore, Result, StoreError, StoredDocument};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Collections held in memory.
///
/// By default the store accepts whatever it is given, like a document
/// database without a uniqueness index. [`MemoryStore::with_unique_data`]
/// turns on the same raw-text uniqueness check that [`crate::SqliteStore`]
/// enforces.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
    unique_data: bool,
    find_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inserts whose raw text already exists in the collection.
    pub fn with_unique_data() -> Self {
        Self {
            unique_data: true,
            ..Self::default()
        }
    }

    /// Put documents directly into a collection, bypassing uniqueness checks.
    pub fn seed(&self, collection: &str, documents: impl IntoIterator<Item = StoredDocument>) {
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    /// Number of `find` calls served.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `insert_documents` calls received, successful or not.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<StoredDocument>>> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents(collection))
    }

    async fn insert_documents(&self, collection: &str, documents: &[StoredDocument]) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.lock();
        let stored = collections.entry(collection.to_string()).or_default();

        if self.unique_data {
            let mut seen: HashSet<&str> = stored.iter().map(|d| d.data.as_str()).collect();
            for doc in documents {
                if !seen.insert(doc.data.as_str()) {
                    return Err(StoreError::duplicate(collection, doc.data.clone()));
                }
            }
        }

        stored.extend(documents.iter().cloned());
        Ok(())
    }
}
