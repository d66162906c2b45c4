//! Declarative rule definition types with serde (de)serialization.
//!
//! Mirrors the on-disk format one-to-one:
//! - `RuleDefinition`: one labelled rule (label, optional id, active switch, prototype text)
//! - `ConditionDefinition`: the three optional pattern groups of a rule body
//! - `PatternDefinition`: a regex source plus its flag names
//!
//! These types carry no compiled state. The loader turns them into an
//! executable [`RuleSet`](crate::RuleSet).

mod condition;
mod pattern;
mod rule;

pub use condition::*;
pub use pattern::*;
pub use rule::*;

#[cfg(test)]
mod tests;
