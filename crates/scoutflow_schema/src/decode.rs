//! Typed field decoding for classified codes.
//!
//! Decoding splits the body that follows the start character on the kind's
//! separator and parses each piece as its declared [`FieldType`]. It does not
//! participate in acceptance; a code that fails to decode is still a valid,
//! classified record.

use crate::error::DecodeError;
use crate::registry::{FieldType, RecordKind};
use serde::Serialize;

/// A parsed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A field name paired with its decoded value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedField {
    pub name: String,
    pub value: FieldValue,
}

impl RecordKind {
    /// Decode the body of a code of this kind (everything after the start character).
    pub fn decode(&self, remainder: &str) -> Result<Vec<DecodedField>, DecodeError> {
        let pieces: Vec<&str> = remainder.split(self.separator()).collect();
        if pieces.len() != self.fields().len() {
            return Err(DecodeError::FieldCount {
                kind: self.name().to_string(),
                expected: self.fields().len(),
                got: pieces.len(),
            });
        }

        self.fields()
            .iter()
            .zip(pieces)
            .map(|(spec, piece)| {
                parse_value(spec.field_type, piece)
                    .map(|value| DecodedField {
                        name: spec.name.clone(),
                        value,
                    })
                    .ok_or_else(|| DecodeError::InvalidValue {
                        kind: self.name().to_string(),
                        field: spec.name.clone(),
                        expected: spec.field_type,
                        value: piece.to_string(),
                    })
            })
            .collect()
    }
}

fn parse_value(field_type: FieldType, piece: &str) -> Option<FieldValue> {
    match field_type {
        FieldType::Str => Some(FieldValue::Str(piece.to_string())),
        FieldType::Int => piece.parse().ok().map(FieldValue::Int),
        FieldType::Float => piece.parse().ok().map(FieldValue::Float),
        FieldType::Bool => match piece.to_ascii_lowercase().as_str() {
            "1" | "true" => Some(FieldValue::Bool(true)),
            "0" | "false" => Some(FieldValue::Bool(false)),
            _ => None,
        },
    }
}
