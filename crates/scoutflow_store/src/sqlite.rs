//! SQLite-backed document store.

use crate::{DocumentStore, Result, StoreError, StoredDocument};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info};

/// Durable store on a local SQLite file.
///
/// Raw text is unique per collection (`UNIQUE(collection, data)`), which is
/// the write-time backstop for two ingestion runs racing on the same code.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;

        info!(path = %path.display(), "Document store opened");
        Ok(store)
    }

    /// In-memory database (for testing). A single connection keeps one database alive.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                blocklisted INTEGER NOT NULL DEFAULT 0,
                override_json TEXT NOT NULL DEFAULT '{}',
                readable_time TEXT NOT NULL,
                UNIQUE(collection, data),
                UNIQUE(collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    /// Close the connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, data, blocklisted, override_json, readable_time
            FROM documents
            WHERE collection = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<StoredDocument> {
                let override_json: String = row.try_get("override_json")?;
                Ok(StoredDocument {
                    data: row.try_get("data")?,
                    blocklisted: row.try_get("blocklisted")?,
                    override_fields: serde_json::from_str(&override_json)?,
                    id: row.try_get("id")?,
                    readable_time: row.try_get("readable_time")?,
                })
            })
            .collect()
    }

    async fn insert_documents(&self, collection: &str, documents: &[StoredDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for doc in documents {
            let override_json = serde_json::to_string(&doc.override_fields)?;
            let result = sqlx::query(
                r#"
                INSERT INTO documents (collection, id, data, blocklisted, override_json, readable_time)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(collection)
            .bind(&doc.id)
            .bind(&doc.data)
            .bind(doc.blocklisted)
            .bind(override_json)
            .bind(&doc.readable_time)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {}
                // Dropping `tx` rolls back everything inserted so far.
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    // SQLite names the violated columns, e.g. "documents.collection, documents.data".
                    if db_err.message().contains("documents.data") {
                        return Err(StoreError::duplicate(collection, doc.data.clone()));
                    }
                    return Err(StoreError::IdConflict {
                        collection: collection.to_string(),
                        id: doc.id.clone(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
        tx.commit().await?;

        debug!(collection, count = documents.len(), "Inserted documents");
        Ok(())
    }
}
