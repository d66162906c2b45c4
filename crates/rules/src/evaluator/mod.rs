//! Rule evaluation: compiled conditions, rules, and the rule set engine.
//!
//! A [`RuleSet`] is built once by the [`RuleLoader`](crate::loader::RuleLoader)
//! and is read-only afterwards. Single texts are evaluated on the calling
//! thread; batches at or above [`EvalConfig::min_parallel_batch`] are spread
//! over rayon's pool. Output order always follows rule order for labels and
//! input order for batches.

mod condition;
mod rule;


use std::collections::BTreeSet;
use std::path::Path;

use rayon::prelude::*;
use rulebox_core::EvalConfig;
use serde::Serialize;
use tracing::debug;

use crate::loader::{self, RuleLoader};
use crate::schema::RuleDefinition;

pub use condition::{GroupKind, Outcome, PatternGroup, RuleCondition};
pub use rule::Rule;

// ── Rule set ────────────────────────────────────────────────────────

/// Ordered, immutable collection of rules: one labelling engine instance.
///
/// `RuleSet` is `Send + Sync`; share it behind an `Arc` to evaluate from
/// several threads at once.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    config: EvalConfig,
}

impl RuleSet {
    /// Build from already-compiled rules. Rule order is evaluation order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            config: EvalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Load from a JSON string with default settings.
    pub fn from_json(json: &str) -> loader::Result<Self> {
        RuleLoader::new().load_str(json)
    }

    /// Load from a rule file (or directory of rule files) with default settings.
    pub fn from_path(path: impl AsRef<Path>) -> loader::Result<Self> {
        let path = path.as_ref();
        let loader = RuleLoader::new();
        if path.is_dir() {
            loader.load_dir(path)
        } else {
            loader.load_path(path)
        }
    }

    /// Compile in-memory definitions with default settings.
    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> loader::Result<Self> {
        RuleLoader::new().load_definitions(definitions)
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule with the given id.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Distinct labels in order of first definition.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rules
            .iter()
            .map(Rule::label)
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Labels of every rule firing on `text`, in rule order.
    ///
    /// Duplicate labels from distinct rules are all kept. Never fails; an
    /// unmatched text yields an empty vector.
    pub fn assign_labels(&self, text: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(text))
            .map(|rule| rule.label().to_string())
            .collect()
    }

    /// [`assign_labels`](Self::assign_labels) for every text, in input order.
    pub fn assign_labels_vector<S>(&self, texts: &[S]) -> Vec<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        self.map_batch(texts, |text| self.assign_labels(text))
    }

    /// Distinct labels per text, in input order.
    pub fn label_sets<S>(&self, texts: &[S]) -> Vec<BTreeSet<String>>
    where
        S: AsRef<str> + Sync,
    {
        self.map_batch(texts, |text| self.assign_labels(text).into_iter().collect())
    }

    /// Per-rule verdicts for `text`, in rule order, with deciding patterns.
    pub fn explain(&self, text: &str) -> Vec<RuleTrace> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleTrace {
                index,
                id: rule.id().to_string(),
                label: rule.label().to_string(),
                outcome: rule.explain(text),
            })
            .collect()
    }

    /// Definitions equivalent to this rule set, ids included.
    pub fn to_definitions(&self) -> Vec<RuleDefinition> {
        self.rules.iter().map(Rule::to_definition).collect()
    }

    fn map_batch<S, T, F>(&self, texts: &[S], f: F) -> Vec<T>
    where
        S: AsRef<str> + Sync,
        T: Send,
        F: Fn(&str) -> T + Sync,
    {
        let parallel = self.config.should_parallelize(texts.len());
        debug!(texts = texts.len(), rules = self.rules.len(), parallel, "evaluating batch");

        if parallel {
            // Indexed parallel collect keeps input order.
            texts.par_iter().map(|t| f(t.as_ref())).collect()
        } else {
            texts.iter().map(|t| f(t.as_ref())).collect()
        }
    }
}

// ── Explanations ────────────────────────────────────────────────────

/// Verdict of one rule for one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTrace {
    /// Position of the rule in the rule set.
    pub index: usize,
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl RuleTrace {
    pub fn fired(&self) -> bool {
        self.outcome.is_match()
    }
}
