//! Rule body: OR / AND / NOT pattern groups.

use serde::{Deserialize, Deserializer, Serialize};

use super::PatternDefinition;

/// Rule body with three optional pattern groups.
///
/// A group that is present must be non-empty; the loader rejects `[]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConditionDefinition {
    #[serde(default, deserialize_with = "present_group", skip_serializing_if = "Option::is_none")]
    pub or_patterns: Option<Vec<PatternDefinition>>,
    #[serde(default, deserialize_with = "present_group", skip_serializing_if = "Option::is_none")]
    pub and_patterns: Option<Vec<PatternDefinition>>,
    #[serde(default, deserialize_with = "present_group", skip_serializing_if = "Option::is_none")]
    pub not_patterns: Option<Vec<PatternDefinition>>,
}

impl ConditionDefinition {
    /// Body matching when at least one of `patterns` matches.
    pub fn any_of(patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        Self {
            or_patterns: Some(patterns.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Body matching when every one of `patterns` matches.
    pub fn all_of(patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        Self {
            and_patterns: Some(patterns.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Body matching when none of `patterns` match.
    pub fn none_of(patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        Self {
            not_patterns: Some(patterns.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_or(mut self, patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        self.or_patterns = Some(patterns.into_iter().collect());
        self
    }

    pub fn with_and(mut self, patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        self.and_patterns = Some(patterns.into_iter().collect());
        self
    }

    pub fn with_not(mut self, patterns: impl IntoIterator<Item = PatternDefinition>) -> Self {
        self.not_patterns = Some(patterns.into_iter().collect());
        self
    }

    /// True when no group is present at all.
    pub fn is_empty(&self) -> bool {
        self.or_patterns.is_none() && self.and_patterns.is_none() && self.not_patterns.is_none()
    }
}

/// A group key that is present must hold an array. Only a missing key
/// yields `None`; `null` is a type error like any other non-array.
fn present_group<'de, D>(deserializer: D) -> Result<Option<Vec<PatternDefinition>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<PatternDefinition>::deserialize(deserializer).map(Some)
}
