//! Error types for schema loading, classification and decoding.

use crate::registry::FieldType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a schema.
///
/// All of these are fatal at startup: no ingestion can proceed safely
/// against a schema that is malformed or ambiguous.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Schema defines no record kinds (expected a non-empty `kinds` mapping)")]
    NoKinds,

    #[error("Record kind names must be strings")]
    InvalidKindName,

    #[error("Kind '{kind}' is missing required key `{key}`")]
    MissingKey { kind: String, key: &'static str },

    #[error("Kind '{kind}': `{key}` must be exactly one character, got {value:?}")]
    NotSingleChar {
        kind: String,
        key: &'static str,
        value: String,
    },

    #[error("Kind '{kind}': field '{field}' has unknown type '{field_type}'")]
    UnknownFieldType {
        kind: String,
        field: String,
        field_type: String,
    },

    #[error("Kind '{kind}' has an invalid definition: {message}")]
    InvalidKind { kind: String, message: String },

    #[error("Duplicate record kind '{0}'")]
    DuplicateKind(String),

    #[error("Kind '{kind}' declares field '{field}' more than once")]
    DuplicateField { kind: String, field: String },

    #[error("Kinds '{first}' and '{second}' share start character '{start}'")]
    DuplicateStartCharacter {
        first: String,
        second: String,
        start: char,
    },

    #[error("Code matches more than one record kind: {}", kinds.join(", "))]
    AmbiguousStart { kinds: Vec<String> },
}

/// Errors raised while decoding a classified code into typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Kind '{kind}' expects {expected} fields, code has {got}")]
    FieldCount {
        kind: String,
        expected: usize,
        got: usize,
    },

    #[error("Kind '{kind}': field '{field}' expects {expected}, got {value:?}")]
    InvalidValue {
        kind: String,
        field: String,
        expected: FieldType,
        value: String,
    },
}
