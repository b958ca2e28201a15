use std::collections::BTreeMap;

use crate::errors::Result;
use crate::matcher::Pattern;
use crate::model::{Annotations, RawRule};

use super::validation::validate_rule;

/// A validated rule with its patterns parsed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    namespace_pattern: Pattern,
    name_pattern: Pattern,
    annotations: Annotations,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace_pattern(&self) -> &Pattern {
        &self.namespace_pattern
    }

    pub fn name_pattern(&self) -> &Pattern {
        &self.name_pattern
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// True when the rule applies to the object `namespace/name`.
    ///
    /// An empty name pattern means "any name".
    pub fn applies_to(&self, namespace: &str, name: &str) -> bool {
        self.namespace_pattern.matches(namespace)
            && (self.name_pattern.is_empty() || self.name_pattern.matches(name))
    }
}

/// Immutable, validated collection of rules keyed by rule name.
///
/// Iteration is in ascending rule-name order; the reconciler relies on this
/// to let the last-sorting rule win annotation key conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// A rule set with no rules; matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate every raw rule and build the set
    ///
    /// All or nothing: a single invalid rule fails the whole construction.
    ///
    /// # Errors
    /// Returns the validation error of the first invalid rule (by name order).
    pub fn from_raw(raw: BTreeMap<String, RawRule>, reserved_key: &str) -> Result<Self> {
        for (rule_name, rule) in &raw {
            validate_rule(rule_name, rule, reserved_key)?;
        }

        let rules = raw
            .into_iter()
            .map(|(rule_name, rule)| {
                let compiled = Rule {
                    name: rule_name.clone(),
                    namespace_pattern: Pattern::parse(&rule.namespace),
                    name_pattern: Pattern::parse(&rule.name),
                    annotations: rule.annotations,
                };
                (rule_name, compiled)
            })
            .collect();

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_name: &str) -> Option<&Rule> {
        self.rules.get(rule_name)
    }

    /// Rule names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// All rules in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rules applying to `namespace/name`, in ascending name order
    pub fn matching<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .values()
            .filter(move |rule| rule.applies_to(namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AnnotatorError;

    const RESERVED: &str = "annotator.ingress.kubernetes.io/managed-annotations";

    fn raw(entries: Vec<(&str, RawRule)>) -> BTreeMap<String, RawRule> {
        entries
            .into_iter()
            .map(|(name, rule)| (name.to_string(), rule))
            .collect()
    }

    #[test]
    fn test_from_raw_builds_sorted_set() {
        let set = RuleSet::from_raw(
            raw(vec![
                ("zeta", RawRule::new("default", "")),
                ("alpha", RawRule::new("prod*", "web")),
            ]),
            RESERVED,
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(set.get("alpha").unwrap().name_pattern().as_str(), "web");
    }

    #[test]
    fn test_one_invalid_rule_rejects_all() {
        let result = RuleSet::from_raw(
            raw(vec![
                ("good", RawRule::new("default", "")),
                ("bad", RawRule::new("invalid_namespace!", "")),
            ]),
            RESERVED,
        );
        assert!(matches!(
            result,
            Err(AnnotatorError::InvalidPattern { ref rule, .. }) if rule == "bad"
        ));
    }

    #[test]
    fn test_empty_name_pattern_matches_any_name() {
        let set = RuleSet::from_raw(raw(vec![("r", RawRule::new("default", ""))]), RESERVED)
            .unwrap();
        let rule = set.get("r").unwrap();
        assert!(rule.applies_to("default", "anything"));
        assert!(!rule.applies_to("other", "anything"));
    }

    #[test]
    fn test_matching_filters_and_orders() {
        let set = RuleSet::from_raw(
            raw(vec![
                ("b", RawRule::new("*", "web-*")),
                ("a", RawRule::new("default", "")),
                ("c", RawRule::new("!default", "")),
            ]),
            RESERVED,
        )
        .unwrap();

        let names: Vec<&str> = set.matching("default", "web-1").map(Rule::name).collect();
        assert_eq!(names, vec!["a", "b"]);

        let names: Vec<&str> = set.matching("staging", "api").map(Rule::name).collect();
        assert!(names.is_empty());
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = RuleSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.matching("default", "x").count(), 0);
    }
}
