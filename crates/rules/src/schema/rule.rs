//! Top-level rule object.

use serde::{Deserialize, Serialize};

use super::ConditionDefinition;

/// One entry of a rule file.
///
/// Unknown keys on the rule object are ignored so rule files can carry
/// authoring metadata. The rule body itself is strict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDefinition {
    /// Label emitted when the rule fires. Used verbatim.
    pub label: String,
    pub rule: ConditionDefinition,
    /// Stable rule id. Generated at load time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Example text the rule is expected to label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto_text: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl RuleDefinition {
    pub fn new(label: impl Into<String>, rule: ConditionDefinition) -> Self {
        Self {
            label: label.into(),
            rule,
            uuid: None,
            proto_text: None,
            active: true,
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_proto_text(mut self, text: impl Into<String>) -> Self {
        self.proto_text = Some(text.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

pub(crate) fn default_true() -> bool {
    true
}
