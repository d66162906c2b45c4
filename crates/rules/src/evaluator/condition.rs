//! Boolean OR / AND / NOT evaluation over compiled pattern groups.
//!
//! Precedence is fixed: a matching `not` pattern vetoes the rule before any
//! positive group is looked at; then the OR group needs one hit and the AND
//! group needs every pattern to hit. When both positive groups are present
//! both must hold. A condition without groups never matches.

use std::fmt;

use serde::Serialize;

use crate::pattern::PatternMatcher;

// ── Groups ──────────────────────────────────────────────────────────

/// Which of the three groups a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Or,
    And,
    Not,
}

impl GroupKind {
    /// Field name of the group in the rule file.
    pub fn field(&self) -> &'static str {
        match self {
            GroupKind::Or => "or_patterns",
            GroupKind::And => "and_patterns",
            GroupKind::Not => "not_patterns",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Ordered, non-empty sequence of compiled patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup(Vec<PatternMatcher>);

impl PatternGroup {
    /// Returns `None` for an empty list; empty groups are not representable.
    pub fn new(patterns: Vec<PatternMatcher>) -> Option<Self> {
        if patterns.is_empty() {
            None
        } else {
            Some(Self(patterns))
        }
    }

    /// First pattern matching `text`, in definition order.
    #[inline]
    pub fn first_match(&self, text: &str) -> Option<&PatternMatcher> {
        self.0.iter().find(|p| p.matches(text))
    }

    #[inline]
    pub fn any(&self, text: &str) -> bool {
        self.0.iter().any(|p| p.matches(text))
    }

    #[inline]
    pub fn all(&self, text: &str) -> bool {
        self.0.iter().all(|p| p.matches(text))
    }

    pub fn patterns(&self) -> &[PatternMatcher] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Condition ───────────────────────────────────────────────────────

/// Combination of the optional OR, AND and NOT groups of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCondition {
    or: Option<PatternGroup>,
    and: Option<PatternGroup>,
    not: Option<PatternGroup>,
}

impl RuleCondition {
    pub fn new(
        or: Option<PatternGroup>,
        and: Option<PatternGroup>,
        not: Option<PatternGroup>,
    ) -> Self {
        Self { or, and, not }
    }

    pub fn group(&self, kind: GroupKind) -> Option<&PatternGroup> {
        match kind {
            GroupKind::Or => self.or.as_ref(),
            GroupKind::And => self.and.as_ref(),
            GroupKind::Not => self.not.as_ref(),
        }
    }

    /// True when no group is present; such a condition never matches.
    pub fn is_empty(&self) -> bool {
        self.or.is_none() && self.and.is_none() && self.not.is_none()
    }

    /// Evaluate against `text`, short-circuiting at the first decisive pattern.
    #[inline]
    pub fn evaluate(&self, text: &str) -> bool {
        if let Some(not) = &self.not {
            if not.any(text) {
                return false;
            }
        }

        match (&self.or, &self.and) {
            // Pure negative rule fires when nothing above vetoed it.
            (None, None) => self.not.is_some(),
            (or, and) => {
                or.as_ref().map_or(true, |g| g.any(text))
                    && and.as_ref().map_or(true, |g| g.all(text))
            }
        }
    }

    /// Evaluate and report which patterns decided the verdict.
    pub fn explain(&self, text: &str) -> Outcome {
        if let Some(not) = &self.not {
            if let Some(hit) = not.first_match(text) {
                return Outcome::Suppressed {
                    pattern: hit.to_string(),
                };
            }
        }

        if self.or.is_none() && self.and.is_none() {
            return if self.not.is_some() {
                Outcome::Matched {
                    patterns: Vec::new(),
                }
            } else {
                Outcome::NoMatch
            };
        }

        let mut patterns = Vec::new();

        if let Some(or) = &self.or {
            match or.first_match(text) {
                Some(hit) => patterns.push(hit.to_string()),
                None => return Outcome::NoMatch,
            }
        }

        if let Some(and) = &self.and {
            for p in and.patterns() {
                if !p.matches(text) {
                    return Outcome::NoMatch;
                }
                patterns.push(p.to_string());
            }
        }

        Outcome::Matched { patterns }
    }
}

/// Verdict of a single rule for one text, with the deciding patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Rule fired. `patterns` lists the positive patterns that matched;
    /// empty for a pure negative rule.
    Matched { patterns: Vec<String> },
    /// A `not` pattern matched and vetoed the rule.
    Suppressed { pattern: String },
    /// Positive groups did not hold, or the rule has no patterns.
    NoMatch,
    /// Rule is switched off.
    Inactive,
}

impl Outcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Matched { .. })
    }
}

// ── Tests ───────────────────────────────────────────────────────────
