//! Rule validation and the immutable rule set built from policy text.

pub mod rule_set;
pub mod validation;

pub use rule_set::{Rule, RuleSet};
