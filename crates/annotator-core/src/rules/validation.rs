use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{AnnotatorError, Result};
use crate::model::RawRule;

/// Lowercase alphanumerics, hyphens and `*`, comma-separated, with at most one
/// leading `!` covering the whole pattern.
static PATTERN_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!?(?:[a-z0-9\-*]+(?:,[a-z0-9\-*]+)*)$").expect("pattern grammar is a valid regex")
});

/// Check a pattern against the load-time grammar. The empty pattern is valid.
pub fn is_valid_pattern(pattern: &str) -> bool {
    pattern.is_empty() || PATTERN_GRAMMAR.is_match(pattern)
}

/// Validate one rule as written in policy text
///
/// Checks, in order:
/// 1. `namespace` pattern satisfies the grammar
/// 2. `name` pattern satisfies the grammar
/// 3. no annotation key is empty
/// 4. no annotation key equals `reserved_key` (the provenance marker)
///
/// # Errors
/// Returns the first violation found, naming the rule and the offending field.
pub fn validate_rule(rule_name: &str, rule: &RawRule, reserved_key: &str) -> Result<()> {
    if !is_valid_pattern(&rule.namespace) {
        return Err(AnnotatorError::InvalidPattern {
            rule: rule_name.to_string(),
            field: "namespace".to_string(),
            pattern: rule.namespace.clone(),
        });
    }

    if !is_valid_pattern(&rule.name) {
        return Err(AnnotatorError::InvalidPattern {
            rule: rule_name.to_string(),
            field: "name".to_string(),
            pattern: rule.name.clone(),
        });
    }

    for key in rule.annotations.keys() {
        if key.is_empty() {
            return Err(AnnotatorError::EmptyAnnotationKey {
                rule: rule_name.to_string(),
            });
        }
        if key == reserved_key {
            return Err(AnnotatorError::ReservedAnnotationKey {
                rule: rule_name.to_string(),
                key: key.clone(),
            });
        }
    }

    Ok(())
}
