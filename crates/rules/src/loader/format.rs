//! Rule file formats and first-pass parsing.

use std::path::Path;

use serde_json::Value;

use super::error::{LoadError, Result};

/// Serialization format of a rule source. Both carry the same structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick a format from the file extension. Anything that is not
    /// `.yml`/`.yaml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("yml") | Some("yaml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    /// Whether a directory entry should be picked up by `load_dir`.
    pub(crate) fn is_rule_file(path: &Path) -> bool {
        matches!(extension(path).as_deref(), Some("json") | Some("yml") | Some("yaml"))
    }

    /// First pass: parse `text` into a list of raw rule objects.
    ///
    /// Rule objects stay untyped here so the second pass can report type
    /// errors against the index and label of the offending rule.
    pub(crate) fn parse_entries(&self, text: &str) -> Result<Vec<Value>> {
        let document: Value = match self {
            Format::Json => serde_json::from_str(text)
                .map_err(|e| LoadError::malformed("definition", format!("invalid JSON: {e}")))?,
            Format::Yaml => serde_yaml::from_str(text)
                .map_err(|e| LoadError::malformed("definition", format!("invalid YAML: {e}")))?,
        };
        into_entries(document)
    }
}

/// Require the top-level document to be an array.
pub(crate) fn into_entries(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        other => Err(LoadError::malformed(
            "definition",
            format!("expected an array of rule objects, found {}", json_type(&other)),
        )),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("rules.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("rules.YAML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("rules.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("rules")), Format::Json);
    }

    #[test]
    fn rule_file_detection() {
        assert!(Format::is_rule_file(Path::new("a/b.json")));
        assert!(Format::is_rule_file(Path::new("b.yaml")));
        assert!(!Format::is_rule_file(Path::new("readme.txt")));
        assert!(!Format::is_rule_file(Path::new("noext")));
    }

    #[test]
    fn top_level_must_be_array() {
        let err = Format::Json.parse_entries(r#"{"label": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("found an object"), "got: {err}");

        let entries = Format::Yaml.parse_entries("- label: a\n  rule: {}\n").unwrap();
        assert_eq!(entries.len(), 1);
    }
}
