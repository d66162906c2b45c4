//! Compiled regex patterns and their matching flags.
//!
//! A [`PatternMatcher`] is built once at load time and is immutable afterwards,
//! so it can be shared freely across evaluation threads. Matching uses the
//! `regex` crate, which guarantees linear-time search (no catastrophic
//! backtracking on adversarial input).

use std::fmt;

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};

use crate::schema::PatternDefinition;
use crate::validation::fuzzy::fuzzy_match;

// ── Flags ───────────────────────────────────────────────────────────

/// A single supported matching modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `i`: fold case for the whole pattern.
    CaseInsensitive,
    /// `m`: `^` and `$` also match at internal line boundaries.
    MultiLine,
}

/// Spellings accepted for suggestions only. Loading accepts just `i` and `m`.
const FLAG_SPELLINGS: &[(&str, Flag)] = &[
    ("i", Flag::CaseInsensitive),
    ("case_insensitive", Flag::CaseInsensitive),
    ("ignore_case", Flag::CaseInsensitive),
    ("insensitive", Flag::CaseInsensitive),
    ("m", Flag::MultiLine),
    ("multi_line", Flag::MultiLine),
    ("multiline", Flag::MultiLine),
];

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::CaseInsensitive, Flag::MultiLine];

    /// Parse a flag name. Only the exact single-letter names are accepted.
    pub fn parse(name: &str) -> Option<Flag> {
        match name {
            "i" => Some(Flag::CaseInsensitive),
            "m" => Some(Flag::MultiLine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::CaseInsensitive => "i",
            Flag::MultiLine => "m",
        }
    }

    /// Closest supported flag for a rejected name, e.g. `"I"` or `"multiline"`.
    pub fn suggest(name: &str) -> Option<&'static str> {
        let spellings: Vec<&str> = FLAG_SPELLINGS.iter().map(|(s, _)| *s).collect();
        let closest = fuzzy_match(name, &spellings)?;
        FLAG_SPELLINGS
            .iter()
            .find(|(s, _)| *s == closest)
            .map(|(_, flag)| flag.as_str())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of flags attached to one pattern. Order and duplicates are irrelevant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const CASE_INSENSITIVE = 0b01;
        const MULTI_LINE = 0b10;
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::CaseInsensitive => Flags::CASE_INSENSITIVE,
            Flag::MultiLine => Flags::MULTI_LINE,
        }
    }
}

impl Flags {
    /// Resolve flag names into a set, rejecting the first unsupported one.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Flags, PatternError> {
        names.iter().try_fold(Flags::empty(), |acc, name| {
            let name = name.as_ref();
            match Flag::parse(name) {
                Some(flag) => Ok(acc | Flags::from(flag)),
                None => Err(PatternError::UnsupportedFlag {
                    flag: name.to_string(),
                    suggestion: Flag::suggest(name),
                }),
            }
        })
    }

    /// Canonical flag names, `i` before `m`.
    pub fn names(&self) -> Vec<String> {
        Flag::ALL
            .iter()
            .filter(|flag| self.contains(Flags::from(**flag)))
            .map(|flag| flag.as_str().to_string())
            .collect()
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// Why a single pattern could not be built.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid regex '{pattern}': {source}")]
    Compile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported flag '{flag}' (supported: i, m){}", did_you_mean(.suggestion))]
    UnsupportedFlag {
        flag: String,
        suggestion: Option<&'static str>,
    },
}

pub(crate) fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!("; did you mean '{s}'?"),
        None => String::new(),
    }
}

// ── Matcher ─────────────────────────────────────────────────────────

/// One compiled regular expression plus the flags it was built with.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    source: String,
    flags: Flags,
    regex: Regex,
}

impl PatternMatcher {
    /// Compile `pattern` with `flags`.
    pub fn new(pattern: impl Into<String>, flags: Flags) -> Result<Self, PatternError> {
        let source = pattern.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.contains(Flags::CASE_INSENSITIVE))
            .multi_line(flags.contains(Flags::MULTI_LINE))
            .build()
            .map_err(|e| PatternError::Compile {
                pattern: source.clone(),
                source: e,
            })?;
        Ok(Self {
            source,
            flags,
            regex,
        })
    }

    /// Compile `pattern` with flags given by name (`"i"`, `"m"`).
    pub fn with_flag_names<S: AsRef<str>>(
        pattern: impl Into<String>,
        names: &[S],
    ) -> Result<Self, PatternError> {
        let flags = Flags::from_names(names)?;
        Self::new(pattern, flags)
    }

    pub fn from_definition(def: &PatternDefinition) -> Result<Self, PatternError> {
        Self::with_flag_names(def.pattern.as_str(), &def.flags)
    }

    /// Does `text` contain a match anywhere.
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern source as written in the definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn to_definition(&self) -> PatternDefinition {
        PatternDefinition::new(self.source.clone()).with_flags(self.flags.names())
    }
}

impl PartialEq for PatternMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for PatternMatcher {}

impl fmt::Display for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)?;
        for name in self.flags.names() {
            f.write_str(&name)?;
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
