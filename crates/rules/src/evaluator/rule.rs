//! A labelled rule: one condition plus the label it emits.

use crate::schema::{ConditionDefinition, PatternDefinition, RuleDefinition};

use super::condition::{GroupKind, Outcome, RuleCondition};

/// Executable rule. Built by the loader, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: String,
    label: String,
    condition: RuleCondition,
    active: bool,
    proto_text: Option<String>,
}

impl Rule {
    /// New active rule with a freshly generated id.
    pub fn new(label: impl Into<String>, condition: RuleCondition) -> Self {
        Self {
            id: generate_id(),
            label: label.into(),
            condition,
            active: true,
            proto_text: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_proto_text(mut self, text: Option<String>) -> Self {
        self.proto_text = text;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn condition(&self) -> &RuleCondition {
        &self.condition
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn proto_text(&self) -> Option<&str> {
        self.proto_text.as_deref()
    }

    /// Whether this rule fires on `text`. Inactive rules never fire.
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.active && self.condition.evaluate(text)
    }

    pub fn explain(&self, text: &str) -> Outcome {
        if !self.active {
            return Outcome::Inactive;
        }
        self.condition.explain(text)
    }

    /// Definition equivalent to this rule, id included.
    pub fn to_definition(&self) -> RuleDefinition {
        let group = |kind: GroupKind| -> Option<Vec<PatternDefinition>> {
            self.condition
                .group(kind)
                .map(|g| g.patterns().iter().map(|p| p.to_definition()).collect())
        };
        RuleDefinition {
            label: self.label.clone(),
            rule: ConditionDefinition {
                or_patterns: group(GroupKind::Or),
                and_patterns: group(GroupKind::And),
                not_patterns: group(GroupKind::Not),
            },
            uuid: Some(self.id.clone()),
            proto_text: self.proto_text.clone(),
            active: self.active,
        }
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
