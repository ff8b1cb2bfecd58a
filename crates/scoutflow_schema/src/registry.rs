//! Schema registry
//!
//! A [`Schema`] is the closed set of record kinds, validated once at load
//! time and read-only afterwards. There is no mutation API.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Declared type of a single field in a code body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
        }
    }

    fn from_schema_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "str" | "string" => Some(FieldType::Str),
            "int" | "integer" => Some(FieldType::Int),
            "float" => Some(FieldType::Float),
            "bool" | "boolean" => Some(FieldType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// One record kind: a unique start character, a separator and an ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordKind {
    name: String,
    start_character: char,
    separator: char,
    fields: Vec<FieldSpec>,
}

impl RecordKind {
    /// Create a kind definition. Invariants are checked by [`Schema::from_kinds`].
    pub fn new(
        name: impl Into<String>,
        start_character: char,
        separator: char,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            start_character,
            separator,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_character(&self) -> char {
        self.start_character
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::InvalidKind {
                kind: self.name.clone(),
                message: "kind name is empty".to_string(),
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::InvalidKind {
                kind: self.name.clone(),
                message: "no fields declared".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::InvalidKind {
                    kind: self.name.clone(),
                    message: "field with empty name".to_string(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    kind: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The validated, closed set of record kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    kinds: Vec<RecordKind>,
}

impl Schema {
    /// Build a schema from kind definitions, enforcing that kind names and
    /// start characters are pairwise distinct.
    pub fn from_kinds(kinds: Vec<RecordKind>) -> Result<Self, SchemaError> {
        if kinds.is_empty() {
            return Err(SchemaError::NoKinds);
        }

        let mut names = HashSet::new();
        let mut starts: HashMap<char, &str> = HashMap::new();
        for kind in &kinds {
            kind.validate()?;
            if !names.insert(kind.name.as_str()) {
                return Err(SchemaError::DuplicateKind(kind.name.clone()));
            }
            if let Some(first) = starts.insert(kind.start_character, kind.name.as_str()) {
                return Err(SchemaError::DuplicateStartCharacter {
                    first: first.to_string(),
                    second: kind.name.clone(),
                    start: kind.start_character,
                });
            }
        }

        Ok(Self { kinds })
    }

    /// Skip validation. Only for exercising the classifier's ambiguity guard.
    #[cfg(test)]
    pub(crate) fn unchecked(kinds: Vec<RecordKind>) -> Self {
        Self { kinds }
    }

    /// Parse and validate a YAML schema document.
    pub fn from_yaml_str(source: &str) -> Result<Self, SchemaError> {
        if source.trim().is_empty() {
            return Err(SchemaError::NoKinds);
        }

        let raw: RawSchema = serde_yaml::from_str(source)?;
        let mapping = raw.kinds.ok_or(SchemaError::NoKinds)?;

        let mut kinds = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = key.as_str().ok_or(SchemaError::InvalidKindName)?.to_string();
            let raw_kind: RawKind =
                serde_yaml::from_value(value).map_err(|e| SchemaError::InvalidKind {
                    kind: name.clone(),
                    message: e.to_string(),
                })?;
            kinds.push(raw_kind.into_kind(name)?);
        }

        Self::from_kinds(kinds)
    }

    /// Read and validate a YAML schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Kinds in definition order.
    pub fn kinds(&self) -> &[RecordKind] {
        &self.kinds
    }

    pub fn kind(&self, name: &str) -> Option<&RecordKind> {
        self.kinds.iter().find(|k| k.name == name)
    }
}

/// Parse and validate a YAML schema document.
pub fn load_schema(source: &str) -> Result<Schema, SchemaError> {
    Schema::from_yaml_str(source)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    kinds: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKind {
    start_character: Option<String>,
    separator: Option<String>,
    fields: Option<Vec<RawField>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: Option<String>,
    #[serde(rename = "type")]
    field_type: Option<String>,
}

impl RawKind {
    fn into_kind(self, name: String) -> Result<RecordKind, SchemaError> {
        let start = self.start_character.ok_or_else(|| SchemaError::MissingKey {
            kind: name.clone(),
            key: "start_character",
        })?;
        let start_character = single_char(&name, "start_character", &start)?;

        let separator = self.separator.ok_or_else(|| SchemaError::MissingKey {
            kind: name.clone(),
            key: "separator",
        })?;
        let separator = single_char(&name, "separator", &separator)?;

        let raw_fields = self.fields.ok_or_else(|| SchemaError::MissingKey {
            kind: name.clone(),
            key: "fields",
        })?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        for raw in raw_fields {
            let field_name = raw.name.ok_or_else(|| SchemaError::MissingKey {
                kind: name.clone(),
                key: "fields[].name",
            })?;
            let type_name = raw.field_type.ok_or_else(|| SchemaError::MissingKey {
                kind: name.clone(),
                key: "fields[].type",
            })?;
            let field_type =
                FieldType::from_schema_name(&type_name).ok_or_else(|| {
                    SchemaError::UnknownFieldType {
                        kind: name.clone(),
                        field: field_name.clone(),
                        field_type: type_name.clone(),
                    }
                })?;
            fields.push(FieldSpec::new(field_name, field_type));
        }

        Ok(RecordKind::new(name, start_character, separator, fields))
    }
}

fn single_char(kind: &str, key: &'static str, value: &str) -> Result<char, SchemaError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(SchemaError::NotSingleChar {
            kind: kind.to_string(),
            key,
            value: value.to_string(),
        }),
    }
}
