//! Runtime configuration
//!
//! Values come from the environment and can be overridden programmatically
//! (tests, CLI flags) through the `with_*` builders.

use annotator_core_types::ObjectKey;

use crate::errors::{AnnotatorError, Result};
use crate::logging_facility::Profile;
use crate::reconcile::DEFAULT_PROVENANCE_KEY;

/// Namespace of the source object; required
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";
/// Name of the source object
pub const ENV_SOURCE_NAME: &str = "ANNOTATOR_SOURCE_NAME";
/// Annotation key for the provenance marker
pub const ENV_PROVENANCE_KEY: &str = "ANNOTATOR_PROVENANCE_KEY";
/// `text` or `json`
pub const ENV_LOG_FORMAT: &str = "ANNOTATOR_LOG_FORMAT";

pub const DEFAULT_SOURCE_NAME: &str = "ingress-annotator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatorConfig {
    /// Where the policy lives
    pub source: ObjectKey,
    /// Annotation key holding the provenance marker on targets
    pub provenance_key: String,
    pub log_profile: Profile,
}

impl AnnotatorConfig {
    /// Defaults for everything except the source object location
    pub fn new(source: ObjectKey) -> Self {
        Self {
            source,
            provenance_key: DEFAULT_PROVENANCE_KEY.to_string(),
            log_profile: Profile::Development,
        }
    }

    /// Load from the process environment
    ///
    /// # Errors
    /// `InvalidConfig` if `POD_NAMESPACE` is unset or empty, or the log
    /// format is unknown.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    ///
    /// # Errors
    /// See [`AnnotatorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup(ENV_POD_NAMESPACE)
            .filter(|ns| !ns.trim().is_empty())
            .ok_or_else(|| AnnotatorError::InvalidConfig {
                reason: format!("{} environment variable is not set or is empty", ENV_POD_NAMESPACE),
            })?;

        let name = lookup(ENV_SOURCE_NAME)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());

        let mut config = Self::new(ObjectKey::new(namespace, name));

        if let Some(key) = lookup(ENV_PROVENANCE_KEY).filter(|key| !key.is_empty()) {
            config.provenance_key = key;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_profile = format
                .parse()
                .map_err(|reason| AnnotatorError::InvalidConfig { reason })?;
        }

        Ok(config)
    }

    pub fn with_provenance_key(mut self, key: impl Into<String>) -> Self {
        self.provenance_key = key.into();
        self
    }

    pub fn with_log_profile(mut self, profile: Profile) -> Self {
        self.log_profile = profile;
        self
    }
}
