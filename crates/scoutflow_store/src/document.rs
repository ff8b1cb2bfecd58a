use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One persisted record, in the shape the store keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Raw code text, byte-for-byte as scanned.
    pub data: String,

    #[serde(default)]
    pub blocklisted: bool,

    /// Operator corrections keyed by field name.
    #[serde(rename = "override", default)]
    pub override_fields: Map<String, Value>,

    /// Record identifier in its text form.
    pub id: String,

    pub readable_time: String,
}

impl StoredDocument {
    /// A fresh, non-blocklisted document with no overrides.
    pub fn new(
        data: impl Into<String>,
        id: impl Into<String>,
        readable_time: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            blocklisted: false,
            override_fields: Map::new(),
            id: id.into(),
            readable_time: readable_time.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let doc = StoredDocument::new("*abc", "01HZZZZZZZZZZZZZZZZZZZZZZZ", "2024-01-01 00:00:00.000");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"], "*abc");
        assert_eq!(value["blocklisted"], false);
        assert_eq!(value["override"], serde_json::json!({}));
        assert_eq!(value["readableTime"], "2024-01-01 00:00:00.000");
    }

    #[test]
    fn test_defaults_on_read() {
        let doc: StoredDocument = serde_json::from_value(serde_json::json!({
            "data": "+xyz",
            "id": "abc",
            "readableTime": "t",
        }))
        .unwrap();
        assert!(!doc.blocklisted);
        assert!(doc.override_fields.is_empty());
    }
}
