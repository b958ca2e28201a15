use std::collections::BTreeMap;

use annotator_core::reconcile::DEFAULT_PROVENANCE_KEY;
use annotator_core::{Annotations, RawRule, RuleSet};

/// Build annotations from literal pairs
#[allow(dead_code)]
pub fn annotations(pairs: &[(&str, &str)]) -> Annotations {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build a validated rule set from named raw rules
#[allow(dead_code)]
pub fn rule_set(rules: Vec<(&str, RawRule)>) -> RuleSet {
    let raw: BTreeMap<String, RawRule> = rules
        .into_iter()
        .map(|(name, rule)| (name.to_string(), rule))
        .collect();
    RuleSet::from_raw(raw, DEFAULT_PROVENANCE_KEY).unwrap()
}

/// Current annotations after applying whatever the reconcile produced
#[allow(dead_code)]
pub fn converge(namespace: &str, name: &str, current: &Annotations, rules: &RuleSet) -> Annotations {
    let mut next = current.clone();
    if let Some(mutation) = annotator_core::reconcile(namespace, name, current, rules)
        .unwrap()
        .mutation()
    {
        mutation.apply_to(&mut next);
    }
    next
}
