//! Error types for rule loading.

use std::fmt;
use std::path::PathBuf;

use crate::evaluator::GroupKind;
use crate::pattern::did_you_mean;

/// Which rule a load error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    /// Zero-based position in the rule array.
    pub index: usize,
    /// Label, when it could be read.
    pub label: Option<String>,
}

impl RuleContext {
    pub fn new(index: usize, label: Option<&str>) -> Self {
        Self {
            index,
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }
}

impl fmt::Display for RuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule #{}", self.index)?;
        if let Some(label) = &self.label {
            write!(f, " ('{label}')")?;
        }
        Ok(())
    }
}

/// Errors that abort building a rule set. No partial rule set is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The rule source could not be read.
    #[error("failed to read rule source '{}': {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a well-formed sequence of rule objects.
    #[error("malformed rule definition at {location}: {message}")]
    MalformedDefinition { location: String, message: String },

    /// A pattern is not a valid regular expression.
    #[error("{rule}: invalid pattern '{pattern}' in {group}[{position}]: {source}")]
    PatternCompile {
        rule: RuleContext,
        group: GroupKind,
        position: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A flag outside `{i, m}` was given.
    #[error(
        "{rule}: unsupported flag '{flag}' on pattern '{pattern}' in {group}[{position}] (supported: i, m){}",
        did_you_mean(.suggestion)
    )]
    UnsupportedFlag {
        rule: RuleContext,
        group: GroupKind,
        position: usize,
        pattern: String,
        flag: String,
        suggestion: Option<&'static str>,
    },

    /// Any of the above, raised while loading one file of a directory.
    #[error("in '{}': {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },
}

/// Coarse category of a [`LoadError`], looking through file wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    SourceRead,
    MalformedDefinition,
    PatternCompile,
    UnsupportedFlag,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::SourceRead { .. } => LoadErrorKind::SourceRead,
            LoadError::MalformedDefinition { .. } => LoadErrorKind::MalformedDefinition,
            LoadError::PatternCompile { .. } => LoadErrorKind::PatternCompile,
            LoadError::UnsupportedFlag { .. } => LoadErrorKind::UnsupportedFlag,
            LoadError::InFile { source, .. } => source.kind(),
        }
    }

    /// Rule the error refers to, if it is rule-specific.
    pub fn rule(&self) -> Option<&RuleContext> {
        match self {
            LoadError::PatternCompile { rule, .. } | LoadError::UnsupportedFlag { rule, .. } => {
                Some(rule)
            }
            LoadError::InFile { source, .. } => source.rule(),
            _ => None,
        }
    }

    pub(crate) fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::MalformedDefinition {
            location: location.into(),
            message: message.into(),
        }
    }

    pub(crate) fn in_file(path: impl Into<PathBuf>, source: LoadError) -> Self {
        LoadError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
