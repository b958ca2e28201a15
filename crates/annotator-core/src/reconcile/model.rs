use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::Annotations;

/// The minimal change that converges one target's annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMutation {
    /// Engine-owned keys that no matching rule contributes any more
    pub remove: BTreeSet<String>,
    /// Keys to set, with their new values
    pub apply: Annotations,
    /// Full merged annotation set from all matching rules
    pub expected: Annotations,
    /// Annotation key the marker is written under
    pub provenance_key: String,
    /// JSON encoding of `expected`
    pub provenance: String,
}

impl AnnotationMutation {
    /// Apply removals, then additions, then the marker, to `annotations`
    pub fn apply_to(&self, annotations: &mut Annotations) {
        for key in &self.remove {
            annotations.remove(key);
        }
        for (key, value) in &self.apply {
            annotations.insert(key.clone(), value.clone());
        }
        annotations.insert(self.provenance_key.clone(), self.provenance.clone());
    }
}

/// Result of reconciling one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Already converged; nothing to write
    Unchanged,
    /// A single update is needed
    Changed(AnnotationMutation),
}

impl ReconcileOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, ReconcileOutcome::Unchanged)
    }

    pub fn mutation(&self) -> Option<&AnnotationMutation> {
        match self {
            ReconcileOutcome::Unchanged => None,
            ReconcileOutcome::Changed(mutation) => Some(mutation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_orders_remove_apply_marker() {
        let mut current = Annotations::new();
        current.insert("old".to_string(), "x".to_string());
        current.insert("keep".to_string(), "y".to_string());

        let mut apply = Annotations::new();
        apply.insert("new".to_string(), "z".to_string());

        let mutation = AnnotationMutation {
            remove: ["old".to_string()].into_iter().collect(),
            apply: apply.clone(),
            expected: apply,
            provenance_key: "marker".to_string(),
            provenance: r#"{"new":"z"}"#.to_string(),
        };
        mutation.apply_to(&mut current);

        assert_eq!(current.get("old"), None);
        assert_eq!(current.get("keep"), Some(&"y".to_string()));
        assert_eq!(current.get("new"), Some(&"z".to_string()));
        assert_eq!(current.get("marker"), Some(&r#"{"new":"z"}"#.to_string()));
    }
}
