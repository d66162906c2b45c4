//! Single regex pattern entry.

use serde::{Deserialize, Serialize};

/// A regex source and its flag names (`"i"`, `"m"`).
///
/// Flags stay as raw strings here so an unsupported flag can be reported
/// with its rule and position instead of as an opaque parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatternDefinition {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl PatternDefinition {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: Vec::new(),
        }
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for a case-insensitive pattern.
    pub fn ci(pattern: impl Into<String>) -> Self {
        Self::new(pattern).with_flags(["i"])
    }
}
