//! `scoutflow schema` and `scoutflow decode`: read-only views of the record kinds.

use crate::cli::config::ResolvedConfig;
use crate::cli::load_schema_file;
use crate::cli::output::print_table;
use anyhow::Result;
use scoutflow_schema::{Classification, DecodedField, FieldValue, RecordKind, Schema};

/// Run the schema command - lists record kinds
pub fn run_show(json: bool, config: &ResolvedConfig) -> Result<()> {
    let schema = load_schema_file(&config.schema_path)?;

    if json {
        let value = serde_json::json!({
            "path": config.schema_path.to_string_lossy(),
            "kinds": schema.kinds(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Schema: {}", config.schema_path.display());
    print_table(&["KIND", "START", "SEPARATOR", "FIELDS"], kind_rows(&schema));
    Ok(())
}

fn kind_rows(schema: &Schema) -> Vec<Vec<String>> {
    schema
        .kinds()
        .iter()
        .map(|kind| {
            vec![
                kind.name().to_string(),
                kind.start_character().to_string(),
                kind.separator().to_string(),
                describe_fields(kind),
            ]
        })
        .collect()
}

fn describe_fields(kind: &RecordKind) -> String {
    kind.fields()
        .iter()
        .map(|f| format!("{}:{}", f.name, f.field_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the decode command - classifies one code and decodes its fields
///
/// A code that classifies but fails to decode is still reported; decoding
/// never decides acceptance.
pub fn run_decode(code: &str, json: bool, config: &ResolvedConfig) -> Result<()> {
    let schema = load_schema_file(&config.schema_path)?;
    let (kind, remainder) = match schema.classify(code)? {
        Classification::Recognized { kind, remainder } => (kind, remainder),
        Classification::Unrecognized => {
            if json {
                let value = serde_json::json!({
                    "code": code,
                    "recognized": false,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("Unrecognized: no record kind starts with the first character of {:?}", code);
            }
            return Ok(());
        }
    };

    let decoded = kind.decode(remainder);
    if json {
        let value = match &decoded {
            Ok(fields) => serde_json::json!({
                "code": code,
                "recognized": true,
                "kind": kind.name(),
                "fields": fields,
            }),
            Err(err) => serde_json::json!({
                "code": code,
                "recognized": true,
                "kind": kind.name(),
                "decode_error": err.to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Kind: {}", kind.name());
    match decoded {
        Ok(fields) => print_table(&["FIELD", "TYPE", "VALUE"], field_rows(kind, &fields)),
        Err(err) => println!("Cannot decode fields: {}", err),
    }
    Ok(())
}

fn field_rows(kind: &RecordKind, fields: &[DecodedField]) -> Vec<Vec<String>> {
    kind.fields()
        .iter()
        .zip(fields)
        .map(|(spec, field)| {
            vec![
                field.name.clone(),
                spec.field_type.to_string(),
                display_value(&field.value),
            ]
        })
        .collect()
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Str(s) => s.clone(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(x) => x.to_string(),
        FieldValue::Bool(b) => b.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoutflow_schema::{FieldSpec, FieldType};

    fn schema() -> Schema {
        Schema::from_kinds(vec![RecordKind::new(
            "pit",
            '#',
            ',',
            vec![
                FieldSpec::new("team", FieldType::Int),
                FieldSpec::new("drivetrain", FieldType::Str),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_kind_rows() {
        let rows = kind_rows(&schema());
        assert_eq!(
            rows,
            vec![vec![
                "pit".to_string(),
                "#".to_string(),
                ",".to_string(),
                "team:int, drivetrain:str".to_string(),
            ]]
        );
    }

    #[test]
    fn test_field_rows() {
        let schema = schema();
        let kind = schema.kind("pit").unwrap();
        let fields = kind.decode("254,swerve").unwrap();
        let rows = field_rows(kind, &fields);
        assert_eq!(rows[0], vec!["team", "int", "254"]);
        assert_eq!(rows[1], vec!["drivetrain", "str", "swerve"]);
    }
}
