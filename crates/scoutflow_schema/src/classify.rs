//! Start-character classification.

use crate::error::SchemaError;
use crate::registry::{RecordKind, Schema};

/// Outcome of classifying one raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'s, 'r> {
    /// The code starts with `kind`'s start character; `remainder` is everything after it.
    Recognized {
        kind: &'s RecordKind,
        remainder: &'r str,
    },
    /// No kind's start character matches.
    Unrecognized,
}

impl<'s, 'r> Classification<'s, 'r> {
    pub fn kind(&self) -> Option<&'s RecordKind> {
        match self {
            Classification::Recognized { kind, .. } => Some(kind),
            Classification::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized { .. })
    }
}

/// Classify `raw` against `schema` by its first character.
///
/// Kind order never affects the outcome. A schema in which more than one kind
/// matches is rejected with [`SchemaError::AmbiguousStart`] instead of picking one.
pub fn classify<'s, 'r>(
    raw: &'r str,
    schema: &'s Schema,
) -> Result<Classification<'s, 'r>, SchemaError> {
    let mut matches = schema
        .kinds()
        .iter()
        .filter(|kind| raw.starts_with(kind.start_character()));

    let Some(kind) = matches.next() else {
        return Ok(Classification::Unrecognized);
    };

    let others: Vec<&RecordKind> = matches.collect();
    if !others.is_empty() {
        let kinds = std::iter::once(kind)
            .chain(others)
            .map(|k| k.name().to_string())
            .collect();
        return Err(SchemaError::AmbiguousStart { kinds });
    }

    let remainder = &raw[kind.start_character().len_utf8()..];
    Ok(Classification::Recognized { kind, remainder })
}

impl Schema {
    /// See [`classify`].
    pub fn classify<'s, 'r>(&'s self, raw: &'r str) -> Result<Classification<'s, 'r>, SchemaError> {
        classify(raw, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FieldSpec, FieldType};
    use proptest::prelude::*;

    fn scouting_schema() -> Schema {
        Schema::from_kinds(vec![
            RecordKind::new(
                "objective",
                '+',
                '$',
                vec![FieldSpec::new("team_number", FieldType::Str)],
            ),
            RecordKind::new(
                "subjective",
                '*',
                '$',
                vec![FieldSpec::new("notes", FieldType::Str)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_recognizes_by_first_character() {
        let schema = scouting_schema();
        match classify("*abc", &schema).unwrap() {
            Classification::Recognized { kind, remainder } => {
                assert_eq!(kind.name(), "subjective");
                assert_eq!(remainder, "abc");
            }
            Classification::Unrecognized => panic!("expected a match"),
        }
        assert_eq!(
            schema.classify("+xyz").unwrap().kind().map(|k| k.name()),
            Some("objective")
        );
    }

    #[test]
    fn test_start_character_elsewhere_does_not_match() {
        let schema = scouting_schema();
        assert_eq!(classify("zzz", &schema).unwrap(), Classification::Unrecognized);
        assert_eq!(classify("a*bc", &schema).unwrap(), Classification::Unrecognized);
        assert_eq!(classify(" *abc", &schema).unwrap(), Classification::Unrecognized);
        assert_eq!(classify("", &schema).unwrap(), Classification::Unrecognized);
    }

    #[test]
    fn test_start_character_alone_has_empty_remainder() {
        let schema = scouting_schema();
        match classify("+", &schema).unwrap() {
            Classification::Recognized { remainder, .. } => assert_eq!(remainder, ""),
            Classification::Unrecognized => panic!("expected a match"),
        }
    }

    #[test]
    fn test_multibyte_start_character() {
        let schema = Schema::from_kinds(vec![RecordKind::new(
            "pit",
            'π',
            ',',
            vec![FieldSpec::new("team", FieldType::Int)],
        )])
        .unwrap();
        match classify("π1678", &schema).unwrap() {
            Classification::Recognized { remainder, .. } => assert_eq!(remainder, "1678"),
            Classification::Unrecognized => panic!("expected a match"),
        }
    }

    #[test]
    fn test_ambiguous_schema_fails_fast() {
        let fields = vec![FieldSpec::new("x", FieldType::Int)];
        let schema = Schema::unchecked(vec![
            RecordKind::new("a", '*', '$', fields.clone()),
            RecordKind::new("b", '*', '$', fields),
        ]);
        match classify("*1", &schema) {
            Err(SchemaError::AmbiguousStart { kinds }) => assert_eq!(kinds, vec!["a", "b"]),
            other => panic!("expected ambiguity error, got {:?}", other),
        }
        // Codes that match nothing are still reported as unrecognized.
        assert_eq!(classify("z", &schema).unwrap(), Classification::Unrecognized);
    }

    proptest! {
        #[test]
        fn prop_every_code_matches_at_most_one_kind(raw in "\\PC{0,12}") {
            let schema = scouting_schema();
            let classification = classify(&raw, &schema).unwrap();
            let expected = schema
                .kinds()
                .iter()
                .filter(|k| raw.starts_with(k.start_character()))
                .count();
            prop_assert!(expected <= 1);
            prop_assert_eq!(classification.is_recognized(), expected == 1);
        }
    }
}
