//! Rule-based text labelling engine.
//!
//! This crate provides:
//! - JSON / YAML rule definitions with serde deserialization
//! - A loader that compiles every regex up front and rejects bad rules
//! - OR / AND / NOT rule evaluation over compiled patterns
//! - Sequential and rayon-parallel batch labelling
//! - Validation with path-addressed errors and "did you mean" suggestions
//!
//! ```no_run
//! use rulebox_rules::RuleSet;
//!
//! let rules = RuleSet::from_path("rules.json")?;
//! let labels = rules.assign_labels("Hello there");
//! # Ok::<(), rulebox_rules::LoadError>(())
//! ```

pub mod evaluator;
pub mod loader;
pub mod pattern;
pub mod schema;
pub mod validation;

pub use evaluator::{GroupKind, Outcome, PatternGroup, Rule, RuleCondition, RuleSet, RuleTrace};
pub use loader::{LoadError, LoadErrorKind, RuleContext, RuleLoader};
pub use pattern::{Flag, Flags, PatternError, PatternMatcher};
pub use schema::{ConditionDefinition, PatternDefinition, RuleDefinition};
pub use validation::ValidationResult;
