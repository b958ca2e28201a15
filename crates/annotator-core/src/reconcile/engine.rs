//! Annotation reconciliation
//!
//! Given a target's current annotations and a rule set snapshot, compute the
//! mutation that converges the target:
//!
//! 1. Match rules against `namespace/name`
//! 2. Merge matched annotations in ascending rule-name order (last wins)
//! 3. Read the provenance marker (invalid JSON degrades to empty)
//! 4. Remove engine-owned keys that are still unmodified and no longer expected
//! 5. Apply expected keys whose current value differs
//! 6. Report `Unchanged` when there is nothing to remove or apply
//! 7. Otherwise emit removals, additions and the new marker
//!
//! The reconciler holds no state and performs no I/O.

use std::collections::BTreeSet;

use crate::errors::Result;
use crate::model::Annotations;
use crate::rules::RuleSet;

use super::model::{AnnotationMutation, ReconcileOutcome};
use super::provenance::{self, DEFAULT_PROVENANCE_KEY};

/// Computes annotation mutations for targets
#[derive(Debug, Clone)]
pub struct Reconciler {
    provenance_key: String,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_PROVENANCE_KEY)
    }
}

impl Reconciler {
    pub fn new(provenance_key: impl Into<String>) -> Self {
        Self {
            provenance_key: provenance_key.into(),
        }
    }

    pub fn provenance_key(&self) -> &str {
        &self.provenance_key
    }

    /// Compute the mutation converging `namespace/name`
    ///
    /// # Errors
    /// `ProvenanceEncode` if the new marker cannot be serialized; nothing is
    /// mutated in that case.
    pub fn reconcile(
        &self,
        namespace: &str,
        name: &str,
        current: &Annotations,
        rule_set: &RuleSet,
    ) -> Result<ReconcileOutcome> {
        let expected = expected_annotations(rule_set, namespace, name);
        let owned = self.read_provenance(namespace, name, current);

        let remove = self.annotations_to_remove(current, &owned, &expected);
        let apply = annotations_to_apply(current, &expected);

        if remove.is_empty() && apply.is_empty() {
            tracing::debug!(namespace, name, "annotations already converged");
            return Ok(ReconcileOutcome::Unchanged);
        }

        let provenance = provenance::encode(&expected)?;

        Ok(ReconcileOutcome::Changed(AnnotationMutation {
            remove,
            apply,
            expected,
            provenance_key: self.provenance_key.clone(),
            provenance,
        }))
    }

    /// Decode the marker on the target. Decode failures are logged and
    /// treated as "engine owns nothing".
    fn read_provenance(&self, namespace: &str, name: &str, current: &Annotations) -> Annotations {
        let raw = current.get(&self.provenance_key).map(String::as_str);
        match provenance::decode(raw) {
            Ok(owned) => owned,
            Err(err) => {
                tracing::warn!(
                    namespace,
                    name,
                    key = self.provenance_key.as_str(),
                    error = %err,
                    "ignoring undecodable provenance marker"
                );
                Annotations::new()
            }
        }
    }

    fn annotations_to_remove(
        &self,
        current: &Annotations,
        owned: &Annotations,
        expected: &Annotations,
    ) -> BTreeSet<String> {
        owned
            .iter()
            .filter(|(key, _)| **key != self.provenance_key)
            .filter(|(key, value)| current.get(*key) == Some(*value))
            .filter(|(key, _)| !expected.contains_key(*key))
            .map(|(key, _)| key.clone())
            .collect()
    }
}

/// Convenience wrapper using the default provenance key
///
/// # Errors
/// See [`Reconciler::reconcile`].
pub fn reconcile(
    namespace: &str,
    name: &str,
    current: &Annotations,
    rule_set: &RuleSet,
) -> Result<ReconcileOutcome> {
    Reconciler::default().reconcile(namespace, name, current, rule_set)
}

/// Merge the annotations of every rule applying to `namespace/name`.
///
/// Rules are visited in ascending name order, so on a key conflict the rule
/// whose name sorts last wins.
pub fn expected_annotations(rule_set: &RuleSet, namespace: &str, name: &str) -> Annotations {
    let mut expected = Annotations::new();
    for rule in rule_set.matching(namespace, name) {
        for (key, value) in rule.annotations() {
            expected.insert(key.clone(), value.clone());
        }
    }
    expected
}

fn annotations_to_apply(current: &Annotations, expected: &Annotations) -> Annotations {
    expected
        .iter()
        .filter(|(key, value)| current.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
