//! Rule validation with structured errors and suggestions.
//!
//! Unlike the loader, which stops at the first problem, validation walks
//! every rule and reports all of them. Errors are problems the loader would
//! reject; warnings flag rules that load fine but probably do not do what
//! their author meant (dead rules, redundant flags, a `proto_text` the rule
//! does not match).

mod rule_checks;

pub(crate) mod fuzzy;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::loader::{rule_files, Format};
use crate::schema::RuleDefinition;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A problem that makes the rule source fail to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"[2].rule.or_patterns[0].flags[1]"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Merge `other` into this result, prefixing every path.
    pub(crate) fn absorb(&mut self, other: ValidationResult, prefix: &str) {
        self.valid &= other.valid;
        self.errors.extend(other.errors.into_iter().map(|mut e| {
            e.path = format!("{prefix}{}", e.path);
            e
        }));
        self.warnings.extend(other.warnings.into_iter().map(|mut w| {
            w.path = format!("{prefix}{}", w.path);
            w
        }));
    }

    /// Whether any error was recorded under `prefix`.
    pub(crate) fn has_errors_under(&self, prefix: &str) -> bool {
        self.errors.iter().any(|e| e.path.starts_with(prefix))
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate already-typed definitions.
pub fn validate_definitions(definitions: &[RuleDefinition]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (index, def) in definitions.iter().enumerate() {
        rule_checks::validate_rule(index, def, &mut result);
    }
    rule_checks::validate_unique_ids(definitions.iter().enumerate(), &mut result);
    result
}

/// Parse a JSON rule array and validate every entry.
pub fn validate_json(json: &str) -> ValidationResult {
    validate_text(json, Format::Json)
}

/// Parse a YAML rule sequence and validate every entry.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    validate_text(yaml, Format::Yaml)
}

/// Read a rule file and validate it. The format follows the file extension.
pub fn validate_path(path: impl AsRef<Path>) -> ValidationResult {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => validate_text(&text, Format::from_path(path)),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("failed to read '{}': {e}", path.display()));
            result
        }
    }
}

/// Validate every rule file directly inside `dir`, in file name order.
///
/// Paths are prefixed with the file name, e.g. `"10-greeting.json[0].label"`.
/// Rule ids must be unique across files, as for
/// [`RuleLoader::load_dir`](crate::RuleLoader::load_dir).
pub fn validate_dir(dir: impl AsRef<Path>) -> ValidationResult {
    let dir = dir.as_ref();
    let mut result = ValidationResult::new();

    let files = match rule_files(dir) {
        Ok(files) => files,
        Err(e) => {
            result.error("", e.to_string());
            return result;
        }
    };

    // uuid -> first "{file}[{index}]" it appeared at.
    let mut ids: HashMap<String, String> = HashMap::new();
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (file_result, typed) = match fs::read_to_string(path) {
            Ok(text) => check_text(&text, Format::from_path(path)),
            Err(e) => {
                result.error(name.clone(), format!("failed to read '{}': {e}", path.display()));
                continue;
            }
        };
        result.absorb(file_result, &name);

        for (index, def) in &typed {
            let Some(uuid) = def.uuid.as_deref() else {
                continue;
            };
            let here = format!("{name}[{index}]");
            match ids.get(uuid) {
                // Same-file duplicates were already reported by check_text.
                Some(first) if !first.starts_with(&format!("{name}[")) => result.error(
                    format!("{here}.uuid"),
                    format!("duplicate uuid '{uuid}' (already used by {first})"),
                ),
                Some(_) => {}
                None => {
                    ids.insert(uuid.to_string(), here);
                }
            }
        }
    }
    result
}

fn validate_text(text: &str, format: Format) -> ValidationResult {
    check_text(text, format).0
}

/// Entries that fail to type are reported and skipped; the rest are still
/// checked so one broken rule does not hide problems in the others.
fn check_text(text: &str, format: Format) -> (ValidationResult, Vec<(usize, RuleDefinition)>) {
    let mut result = ValidationResult::new();

    let entries = match format.parse_entries(text) {
        Ok(entries) => entries,
        Err(e) => {
            result.error("", e.to_string());
            return (result, Vec::new());
        }
    };

    let mut typed = Vec::with_capacity(entries.len());
    for (index, value) in entries.into_iter().enumerate() {
        match parse_entry(value) {
            Ok(def) => typed.push((index, def)),
            Err(message) => result.error(format!("[{index}]"), message),
        }
    }

    for (index, def) in &typed {
        rule_checks::validate_rule(*index, def, &mut result);
    }
    rule_checks::validate_unique_ids(typed.iter().map(|(i, d)| (*i, d)), &mut result);
    (result, typed)
}

fn parse_entry(value: Value) -> std::result::Result<RuleDefinition, String> {
    if !value.is_object() {
        return Err("expected a rule object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
