//! Subcommand implementations. Output goes to the given writer; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rulebox_core::EvalConfig;
use rulebox_rules::validation::{self, ValidationResult};
use rulebox_rules::{RuleLoader, RuleSet};
use tracing::info;

use crate::cli::OutputFormat;

/// Load a rule file or directory.
pub fn load_rules(path: &Path, config: EvalConfig) -> Result<RuleSet> {
    let loader = RuleLoader::with_config(config);
    let rules = if path.is_dir() {
        loader.load_dir(path)
    } else {
        loader.load_path(path)
    }
    .with_context(|| format!("failed to load rules from '{}'", path.display()))?;
    Ok(rules)
}

pub fn label(
    rules: &RuleSet,
    texts: &[String],
    unique: bool,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let labels: Vec<Vec<String>> = if unique {
        rules
            .label_sets(texts)
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect()
    } else {
        rules.assign_labels_vector(texts)
    };
    info!(texts = texts.len(), "labelled texts");

    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &labels)?;
            writeln!(out)?;
        }
        OutputFormat::Lines => {
            for row in &labels {
                writeln!(out, "{}", row.join(","))?;
            }
        }
    }
    Ok(())
}

/// Validate each source and print a JSON report per source. Returns `true`
/// when every source is valid.
pub fn validate(paths: &[PathBuf], out: &mut impl Write) -> Result<bool> {
    let mut all_valid = true;
    for path in paths {
        let result: ValidationResult = if path.is_dir() {
            validation::validate_dir(path)
        } else {
            validation::validate_path(path)
        };
        info!(
            path = %path.display(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated rule source"
        );
        all_valid &= result.valid;

        let report = serde_json::json!({
            "path": path.display().to_string(),
            "valid": result.valid,
            "errors": result.errors,
            "warnings": result.warnings,
        });
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(all_valid)
}

pub fn explain(rules: &RuleSet, text: &str, out: &mut impl Write) -> Result<()> {
    let traces = rules.explain(text);
    serde_json::to_writer_pretty(&mut *out, &traces)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"[
      {"label": "greeting", "rule": {"or_patterns": [{"pattern": "\\bhello\\b", "flags": ["i"]}]}},
      {"label": "greeting", "rule": {"or_patterns": [{"pattern": "\\bhi\\b", "flags": ["i"]}]}},
      {"label": "question", "rule": {"and_patterns": [{"pattern": "\\?"}]}}
    ]"#;

    fn rules() -> RuleSet {
        RuleSet::from_json(RULES).unwrap()
    }

    fn run_label(unique: bool, format: OutputFormat) -> String {
        let texts = vec!["Hello hi?".to_string(), "nothing".to_string()];
        let mut out = Vec::new();
        label(&rules(), &texts, unique, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn label_json_output() {
        assert_eq!(
            run_label(false, OutputFormat::Json),
            "[[\"greeting\",\"greeting\",\"question\"],[]]\n"
        );
    }

    #[test]
    fn label_unique_lines_output() {
        assert_eq!(run_label(true, OutputFormat::Lines), "greeting,question\n\n");
    }

    #[test]
    fn explain_prints_every_rule() {
        let mut out = Vec::new();
        explain(&rules(), "hello", &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let traces = value.as_array().unwrap();
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0]["outcome"], "matched");
        assert_eq!(traces[2]["outcome"], "no_match");
    }

    #[test]
    fn validate_reports_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, RULES).unwrap();
        std::fs::write(&bad, r#"[{"label": "x", "rule": {"or_patterns": [{"pattern": "("}]}}]"#).unwrap();

        let mut out = Vec::new();
        assert!(validate(&[good.clone()], &mut out).unwrap());
        assert!(!validate(&[good, bad], &mut out).unwrap());
    }

    #[test]
    fn load_rules_from_dir_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, RULES).unwrap();

        let from_dir = load_rules(dir.path(), EvalConfig::sequential()).unwrap();
        let from_file = load_rules(&path, EvalConfig::default()).unwrap();
        assert_eq!(from_dir.len(), 3);
        assert_eq!(from_file.len(), 3);
        assert!(!from_dir.config().parallel);

        let err = load_rules(&dir.path().join("missing.json"), EvalConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
