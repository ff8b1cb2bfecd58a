//! Error types for the store layer.

use thiserror::Error;

/// Store operation result type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw text already stored in the collection
    #[error("Duplicate code in collection '{collection}': {data:?}")]
    Duplicate { collection: String, data: String },

    /// Record id already used in the collection
    #[error("Record id already stored in collection '{collection}': {id}")]
    IdConflict { collection: String, id: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn duplicate(collection: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Duplicate {
            collection: collection.into(),
            data: data.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}
