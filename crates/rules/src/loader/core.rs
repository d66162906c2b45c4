//! Core [`RuleLoader`] struct: builds a [`RuleSet`] from rule files, strings
//! or in-memory definitions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rulebox_core::EvalConfig;
use serde_json::Value;
use tracing::{debug, info};

use crate::evaluator::{GroupKind, PatternGroup, Rule, RuleCondition, RuleSet};
use crate::pattern::{PatternError, PatternMatcher};
use crate::schema::{PatternDefinition, RuleDefinition};

use super::error::{LoadError, Result, RuleContext};
use super::format::{self, Format};

/// Compiles rule definitions into an immutable [`RuleSet`].
///
/// Loading is all-or-nothing: the first invalid rule aborts the load and no
/// partial rule set is returned. Every rule set produced carries the
/// loader's [`EvalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RuleLoader {
    config: EvalConfig,
}

impl RuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Load a single rule file. `.yml` / `.yaml` files are read as YAML,
    /// everything else as JSON.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<RuleSet> {
        let path = path.as_ref();
        let rules = compile_all(read_definitions(path)?)?;
        info!(rules = rules.len(), path = %path.display(), "loaded rule file");
        Ok(self.finish(rules))
    }

    /// Load every rule file directly inside `dir`, in file name order.
    ///
    /// Dotfiles, subdirectories and files without a `.json`, `.yml` or
    /// `.yaml` extension are skipped. Rule ids must be unique across all
    /// files. Errors are wrapped in [`LoadError::InFile`].
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<RuleSet> {
        let dir = dir.as_ref();
        let files = rule_files(dir)?;

        let mut rules = Vec::new();
        // (file, index within file) for every compiled rule.
        let mut origins: Vec<(&Path, usize)> = Vec::new();

        for path in &files {
            let compiled = read_definitions(path)
                .and_then(compile_all)
                .map_err(|e| wrap_in_file(path, e))?;
            debug!(rules = compiled.len(), path = %path.display(), "compiled rule file");
            origins.extend((0..compiled.len()).map(|i| (path.as_path(), i)));
            rules.extend(compiled);
        }

        if let Some((first, dup)) = find_duplicate_id(&rules) {
            let (dup_path, dup_index) = origins[dup];
            let (first_path, first_index) = origins[first];
            let ctx = RuleContext::new(dup_index, Some(rules[dup].label()));
            return Err(LoadError::in_file(
                dup_path,
                LoadError::malformed(
                    format!("{ctx}.uuid"),
                    format!(
                        "duplicate uuid '{}' (already used by rule #{first_index} in '{}')",
                        rules[dup].id(),
                        first_path.display()
                    ),
                ),
            ));
        }

        info!(
            files = files.len(),
            rules = rules.len(),
            dir = %dir.display(),
            "loaded rule directory"
        );
        Ok(self.finish(rules))
    }

    /// Load a JSON array of rule objects.
    pub fn load_str(&self, json: &str) -> Result<RuleSet> {
        self.load_text(json, Format::Json)
    }

    /// Load a YAML sequence of rule objects.
    pub fn load_yaml_str(&self, yaml: &str) -> Result<RuleSet> {
        self.load_text(yaml, Format::Yaml)
    }

    /// Load an already-parsed JSON document.
    pub fn load_value(&self, value: Value) -> Result<RuleSet> {
        let definitions = definitions_from_values(format::into_entries(value)?)?;
        self.load_definitions(definitions)
    }

    /// Compile in-memory definitions.
    pub fn load_definitions(&self, definitions: Vec<RuleDefinition>) -> Result<RuleSet> {
        let rules = compile_all(definitions)?;
        info!(rules = rules.len(), "loaded rule definitions");
        Ok(self.finish(rules))
    }

    fn load_text(&self, text: &str, format: Format) -> Result<RuleSet> {
        let definitions = definitions_from_values(format.parse_entries(text)?)?;
        self.load_definitions(definitions)
    }

    fn finish(&self, rules: Vec<Rule>) -> RuleSet {
        RuleSet::new(rules).with_config(self.config)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Read and parse one rule file without compiling it.
fn read_definitions(path: &Path) -> Result<Vec<RuleDefinition>> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definitions(&text, Format::from_path(path))
}

fn parse_definitions(text: &str, format: Format) -> Result<Vec<RuleDefinition>> {
    definitions_from_values(format.parse_entries(text)?)
}

/// Second pass: type each raw rule object, reporting failures against the
/// rule's index and (when readable) its label.
fn definitions_from_values(values: Vec<Value>) -> Result<Vec<RuleDefinition>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if !value.is_object() {
                return Err(LoadError::malformed(
                    RuleContext::new(index, None).to_string(),
                    format!("expected a rule object, found {}", format::json_type(&value)),
                ));
            }
            let label = value.get("label").and_then(Value::as_str).map(str::to_string);
            serde_json::from_value(value).map_err(|e| {
                LoadError::malformed(RuleContext::new(index, label.as_deref()).to_string(), e.to_string())
            })
        })
        .collect()
}

// ── Compilation ─────────────────────────────────────────────────────

fn compile_all(definitions: Vec<RuleDefinition>) -> Result<Vec<Rule>> {
    let rules = definitions
        .iter()
        .enumerate()
        .map(|(index, def)| compile_rule(index, def))
        .collect::<Result<Vec<_>>>()?;

    if let Some((first, dup)) = find_duplicate_id(&rules) {
        let ctx = RuleContext::new(dup, Some(rules[dup].label()));
        return Err(LoadError::malformed(
            format!("{ctx}.uuid"),
            format!("duplicate uuid '{}' (already used by rule #{first})", rules[dup].id()),
        ));
    }
    Ok(rules)
}

/// Compile one definition at position `index` into an executable rule.
fn compile_rule(index: usize, def: &RuleDefinition) -> Result<Rule> {
    let ctx = RuleContext::new(index, Some(&def.label));

    if def.label.trim().is_empty() {
        return Err(LoadError::malformed(format!("{ctx}.label"), "label must not be blank"));
    }

    let condition = RuleCondition::new(
        compile_group(&ctx, GroupKind::Or, def.rule.or_patterns.as_deref())?,
        compile_group(&ctx, GroupKind::And, def.rule.and_patterns.as_deref())?,
        compile_group(&ctx, GroupKind::Not, def.rule.not_patterns.as_deref())?,
    );
    if condition.is_empty() {
        debug!(rule = %ctx, "rule has no pattern groups and will never match");
    }

    let mut rule = Rule::new(def.label.clone(), condition)
        .with_active(def.active)
        .with_proto_text(def.proto_text.clone());

    if let Some(uuid) = &def.uuid {
        if uuid.trim().is_empty() {
            return Err(LoadError::malformed(format!("{ctx}.uuid"), "uuid must not be blank"));
        }
        rule = rule.with_id(uuid.clone());
    }

    Ok(rule)
}

fn compile_group(
    ctx: &RuleContext,
    kind: GroupKind,
    patterns: Option<&[PatternDefinition]>,
) -> Result<Option<PatternGroup>> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Err(LoadError::malformed(
            format!("{ctx}.rule.{kind}"),
            "pattern group must not be empty; omit the key instead",
        ));
    }

    let matchers = patterns
        .iter()
        .enumerate()
        .map(|(position, def)| {
            PatternMatcher::from_definition(def).map_err(|e| match e {
                PatternError::Compile { pattern, source } => LoadError::PatternCompile {
                    rule: ctx.clone(),
                    group: kind,
                    position,
                    pattern,
                    source,
                },
                PatternError::UnsupportedFlag { flag, suggestion } => LoadError::UnsupportedFlag {
                    rule: ctx.clone(),
                    group: kind,
                    position,
                    pattern: def.pattern.clone(),
                    flag,
                    suggestion,
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PatternGroup::new(matchers))
}

/// Positions `(first, duplicate)` of the first repeated rule id.
fn find_duplicate_id(rules: &[Rule]) -> Option<(usize, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(rules.len());
    for (index, rule) in rules.iter().enumerate() {
        if let Some(&first) = seen.get(rule.id()) {
            return Some((first, index));
        }
        seen.insert(rule.id(), index);
    }
    None
}

// ── Directory scan ──────────────────────────────────────────────────

/// Rule files directly inside `dir`, sorted by name.
pub(crate) fn rule_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| LoadError::SourceRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();

        let is_dotfile = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with('.'));
        if is_dotfile {
            debug!(path = %path.display(), "skipping dotfile");
            continue;
        }
        if path.is_dir() {
            debug!(path = %path.display(), "skipping subdirectory");
            continue;
        }
        if !Format::is_rule_file(&path) {
            debug!(path = %path.display(), "skipping non-rule file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Attach the file to an error unless it already names it.
fn wrap_in_file(path: &Path, err: LoadError) -> LoadError {
    match err {
        LoadError::SourceRead { .. } => err,
        other => LoadError::in_file(path, other),
    }
}
