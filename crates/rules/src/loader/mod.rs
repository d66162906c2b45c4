//! Rule loading: JSON / YAML rule sources into a compiled [`RuleSet`](crate::RuleSet).
//!
//! Parsing happens in two passes. The document is first read as a list of
//! untyped values, then each value is typed as a
//! [`RuleDefinition`](crate::schema::RuleDefinition) so that errors carry the
//! index and label of the rule that caused them. Every pattern is compiled
//! before the rule set is returned; any failure aborts the whole load.

mod core;
mod error;
mod format;


pub use self::core::RuleLoader;
pub(crate) use self::core::rule_files;
pub use self::error::{LoadError, LoadErrorKind, Result, RuleContext};
pub use self::format::Format;
