//! In-memory ingestion of structured documents into populate mappings.
//!
//! The engine performs no I/O: callers hand over the text of an already-read
//! document and get back the nested mapping [`crate::ConfigGroup::populate_from`]
//! consumes. Parse failures are structural errors, not validation entries —
//! a document that cannot be read at all never reaches the schema.

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Parse a JSON document into a populate mapping.
pub fn mapping_from_json(text: &str) -> Result<Map<String, Value>, SchemaError> {
    let value: Value = serde_json::from_str(text).map_err(|e| SchemaError::Source {
        format: "json",
        message: e.to_string(),
    })?;
    into_mapping(value, "json")
}

/// Parse a YAML document into a populate mapping.
pub fn mapping_from_yaml(text: &str) -> Result<Map<String, Value>, SchemaError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| SchemaError::Source {
        format: "yaml",
        message: e.to_string(),
    })?;
    into_mapping(value, "yaml")
}

fn into_mapping(value: Value, format: &'static str) -> Result<Map<String, Value>, SchemaError> {
    match value {
        Value::Object(mapping) => Ok(mapping),
        other => Err(SchemaError::Source {
            format,
            message: format!("expected a mapping at the document root, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_and_yaml_produce_the_same_mapping() {
        let from_json = mapping_from_json(r#"{"use": true, "chance": {"standard": 0.5}}"#).unwrap();
        let from_yaml = mapping_from_yaml("use: true\nchance:\n  standard: 0.5\n").unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn a_non_mapping_root_is_a_source_error() {
        assert!(matches!(
            mapping_from_json("[1, 2, 3]"),
            Err(SchemaError::Source { format: "json", .. })
        ));
        assert!(matches!(
            mapping_from_yaml("- 1\n- 2\n"),
            Err(SchemaError::Source { format: "yaml", .. })
        ));
    }

    #[test]
    fn unparsable_text_is_a_source_error() {
        assert!(matches!(
            mapping_from_json("{not json"),
            Err(SchemaError::Source { .. })
        ));
    }
}
