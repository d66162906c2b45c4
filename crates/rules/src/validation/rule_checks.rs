//! Per-rule checks: label, uuid, pattern groups, flags, regexes, proto text.

use std::collections::{HashMap, HashSet};

use crate::evaluator::{GroupKind, PatternGroup, RuleCondition};
use crate::pattern::{Flag, Flags, PatternMatcher};
use crate::schema::{PatternDefinition, RuleDefinition};

use super::ValidationResult;

const GROUPS: [GroupKind; 3] = [GroupKind::Or, GroupKind::And, GroupKind::Not];

pub(super) fn validate_rule(index: usize, def: &RuleDefinition, result: &mut ValidationResult) {
    let prefix = format!("[{index}]");

    if def.label.trim().is_empty() {
        result.error(format!("{prefix}.label"), "label must not be blank");
    }
    if let Some(uuid) = &def.uuid {
        if uuid.trim().is_empty() {
            result.error(format!("{prefix}.uuid"), "uuid must not be blank");
        }
    }

    // Groups compiled while checking; reused for the proto text.
    let mut compiled = [None, None, None];
    let mut all_compiled = true;
    for (slot, kind) in compiled.iter_mut().zip(GROUPS) {
        let patterns = match kind {
            GroupKind::Or => def.rule.or_patterns.as_deref(),
            GroupKind::And => def.rule.and_patterns.as_deref(),
            GroupKind::Not => def.rule.not_patterns.as_deref(),
        };
        if let Some(patterns) = patterns {
            *slot = validate_group(&format!("{prefix}.rule.{kind}"), patterns, result);
            all_compiled &= slot.is_some();
        }
    }

    if def.rule.is_empty() {
        result.warn(
            format!("{prefix}.rule"),
            "rule has no pattern groups and will never match",
        );
    }

    if all_compiled && !result.has_errors_under(&format!("{prefix}.")) {
        let [or, and, not] = compiled;
        validate_proto_text(def, &RuleCondition::new(or, and, not), &prefix, result);
    }
}

/// Check every pattern of a group. Returns the compiled group only when all
/// of its patterns and flags are valid.
fn validate_group(
    path: &str,
    patterns: &[PatternDefinition],
    result: &mut ValidationResult,
) -> Option<PatternGroup> {
    if patterns.is_empty() {
        result.error_with_suggestion(
            path,
            "pattern group must not be empty",
            format!("remove '{}' from the rule", path.rsplit('.').next().unwrap_or(path)),
        );
        return None;
    }

    let errors_before = result.errors.len();
    let mut matchers = Vec::with_capacity(patterns.len());
    for (position, def) in patterns.iter().enumerate() {
        let pattern_path = format!("{path}[{position}]");
        let flags = validate_flags(&pattern_path, &def.flags, result);
        match PatternMatcher::new(def.pattern.as_str(), flags) {
            Ok(matcher) => matchers.push(matcher),
            Err(e) => result.error(format!("{pattern_path}.pattern"), e.to_string()),
        }
    }

    if result.errors.len() > errors_before {
        return None;
    }
    PatternGroup::new(matchers)
}

/// Check flag names; returns the set of the valid ones so the regex can
/// still be compiled.
fn validate_flags(path: &str, names: &[String], result: &mut ValidationResult) -> Flags {
    let mut flags = Flags::empty();
    let mut seen = HashSet::new();

    for (k, name) in names.iter().enumerate() {
        let flag_path = format!("{path}.flags[{k}]");
        match Flag::parse(name) {
            Some(flag) => {
                if !seen.insert(flag) {
                    result.warn(flag_path, format!("flag '{flag}' is repeated"));
                }
                flags |= Flags::from(flag);
            }
            None => {
                let message = format!("unsupported flag '{name}' (supported: i, m)");
                match Flag::suggest(name) {
                    Some(s) => {
                        result.error_with_suggestion(flag_path, message, format!("did you mean '{s}'?"))
                    }
                    None => result.error(flag_path, message),
                }
            }
        }
    }
    flags
}

/// A rule's `proto_text` is an example it should label. Evaluated against the
/// condition regardless of the `active` switch.
fn validate_proto_text(
    def: &RuleDefinition,
    condition: &RuleCondition,
    prefix: &str,
    result: &mut ValidationResult,
) {
    let Some(text) = def.proto_text.as_deref() else {
        return;
    };
    if !condition.evaluate(text) {
        result.warn(
            format!("{prefix}.proto_text"),
            format!("rule '{}' does not match its own proto_text", def.label),
        );
    }
}

pub(super) fn validate_unique_ids<'a>(
    definitions: impl Iterator<Item = (usize, &'a RuleDefinition)>,
    result: &mut ValidationResult,
) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, def) in definitions {
        let Some(uuid) = def.uuid.as_deref() else {
            continue;
        };
        if let Some(first) = seen.get(uuid) {
            result.error(
                format!("[{index}].uuid"),
                format!("duplicate uuid '{uuid}' (already used by [{first}])"),
            );
        } else {
            seen.insert(uuid, index);
        }
    }
}
