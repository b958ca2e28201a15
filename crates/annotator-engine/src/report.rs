//! Reconcile results

use std::collections::BTreeSet;

use annotator_core::{Annotations, ObjectKey};
use annotator_core_types::ReconcileId;
use serde::Serialize;

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// Annotations already converged; nothing written
    Unchanged,
    /// One update was written
    Updated {
        removed: BTreeSet<String>,
        applied: Annotations,
        resource_version: u64,
    },
    /// The target does not exist (or vanished before the write)
    Missing,
}

/// Result of reconciling one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub reconcile_id: ReconcileId,
    pub target: ObjectKey,
    /// Rule store generation the reconcile ran against
    pub generation: u64,
    #[serde(flatten)]
    pub status: ReconcileStatus,
}

impl ReconcileReport {
    pub fn is_updated(&self) -> bool {
        matches!(self.status, ReconcileStatus::Updated { .. })
    }
}

/// Result of reconciling many targets
///
/// Conflicted targets are listed rather than failing the batch; re-running
/// them is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub reports: Vec<ReconcileReport>,
    pub conflicts: Vec<ObjectKey>,
}

impl BatchReport {
    pub fn updated(&self) -> usize {
        self.reports.iter().filter(|r| r.is_updated()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status == ReconcileStatus::Unchanged)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: ReconcileStatus) -> ReconcileReport {
        ReconcileReport {
            reconcile_id: ReconcileId::from_string("r-1".to_string()),
            target: ObjectKey::new("default", "web"),
            generation: 3,
            status,
        }
    }

    #[test]
    fn test_report_serializes_flat_with_status_tag() {
        let json = serde_json::to_value(report(ReconcileStatus::Updated {
            removed: ["old".to_string()].into_iter().collect(),
            applied: [("new".to_string(), "v".to_string())].into_iter().collect(),
            resource_version: 4,
        }))
        .unwrap();

        assert_eq!(json["status"], "updated");
        assert_eq!(json["target"]["namespace"], "default");
        assert_eq!(json["removed"][0], "old");
        assert_eq!(json["applied"]["new"], "v");
        assert_eq!(json["generation"], 3);
    }

    #[test]
    fn test_batch_counts() {
        let batch = BatchReport {
            reports: vec![
                report(ReconcileStatus::Unchanged),
                report(ReconcileStatus::Missing),
                report(ReconcileStatus::Updated {
                    removed: BTreeSet::new(),
                    applied: Annotations::new(),
                    resource_version: 2,
                }),
            ],
            conflicts: vec![],
        };
        assert_eq!(batch.updated(), 1);
        assert_eq!(batch.unchanged(), 1);
        assert!(batch.is_clean());
    }
}
