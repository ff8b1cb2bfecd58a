//! Record-kind schema for scanned codes
//!
//! Field operators produce short text codes offline. The first character of
//! a code says which kind of record it is; the rest is a separator-delimited
//! list of field values. This crate owns that contract:
//!
//! 1. **Registry**: load the closed set of [`RecordKind`]s from YAML once, and
//!    refuse anything ambiguous (two kinds sharing a start character) or
//!    incomplete (a kind without a separator or fields).
//! 2. **Classification**: map a raw code to exactly one kind, or to
//!    [`Classification::Unrecognized`].
//! 3. **Decoding**: split a classified body into typed field values. Decoding
//!    is for inspection; it never decides whether a code is accepted.
//!
//! # Modules
//!
//! - [`registry`]: schema types and loading
//! - [`classify`]: start-character classification
//! - [`decode`]: typed field decoding

pub mod classify;
pub mod decode;
pub mod error;
pub mod registry;

pub use classify::{classify, Classification};
pub use decode::{DecodedField, FieldValue};
pub use error::{DecodeError, SchemaError};
pub use registry::{load_schema, FieldSpec, FieldType, RecordKind, Schema};
