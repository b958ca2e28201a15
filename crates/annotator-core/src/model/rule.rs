use serde::{Deserialize, Serialize};

use super::Annotations;

/// A rule record exactly as it appears in policy text, before validation.
///
/// `name` also accepts the legacy key `ingress`. Missing fields default to
/// empty, and an empty pattern matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub namespace: String,
    #[serde(default, alias = "ingress", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RawRule {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            annotations: Annotations::new(),
        }
    }

    /// Add one annotation (builder style, mostly for tests and fixtures)
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}
