use std::collections::BTreeMap;

use annotator_core_types::ObjectKey;
use serde::{Deserialize, Serialize};

use super::Annotations;

/// A target object as read from the repository.
///
/// `resource_version` is the optimistic-concurrency token: an update carrying
/// a version other than the stored one is rejected as a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetObject {
    #[serde(flatten)]
    pub key: ObjectKey,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub resource_version: u64,
}

impl TargetObject {
    pub fn new(key: ObjectKey) -> Self {
        Self {
            key,
            annotations: Annotations::new(),
            resource_version: 0,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

/// The object carrying the policy: each data entry is one rule, keyed by rule name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    #[serde(flatten)]
    pub key: ObjectKey,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub resource_version: u64,
}

impl SourceObject {
    pub fn new(key: ObjectKey) -> Self {
        Self {
            key,
            data: BTreeMap::new(),
            resource_version: 0,
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.data.insert(name.into(), text.into());
        self
    }
}
