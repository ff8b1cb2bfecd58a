//! CLI module for scoutflow
//!
//! `ingest` is the only command that writes. `schema`, `decode`, `list` and
//! `config` are read-only.

pub mod config;
pub mod error;
pub mod output;

pub mod ingest;
pub mod list;
pub mod schema;

use anyhow::Result;
use scoutflow_schema::{Schema, SchemaError};
use std::path::Path;

use error::HelpfulError;

/// Load the schema, turning failures into a helpful error.
pub(crate) fn load_schema_file(path: &Path) -> Result<Schema> {
    Schema::load(path).map_err(|err| match err {
        SchemaError::Io { .. } => HelpfulError::schema_unavailable(path, &err).into(),
        other => HelpfulError::schema_invalid(path, &other).into(),
    })
}

/// Build the single-threaded runtime commands use for store access.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
