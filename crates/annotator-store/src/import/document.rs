//! Import document schema
//!
//! ```yaml
//! schema_version: 0
//! source:
//!   namespace: system
//!   name: ingress-annotator
//!   data:
//!     rule1: |
//!       namespace: default
//!       annotations:
//!         team: web
//! targets:
//!   - namespace: default
//!     name: web
//!     annotations:
//!       owner: alice
//! ```

use annotator_core::{SourceObject, TargetObject};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{document_serialization, Result};

/// Top-level import file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportDocument {
    /// Schema version (must be 0 for this format)
    #[serde(default)]
    pub schema_version: u32,

    /// Object carrying the policy, if this import provides one
    #[serde(default)]
    pub source: Option<SourceObject>,

    #[serde(default)]
    pub targets: Vec<TargetObject>,
}

/// SHA-256 over the canonical JSON form of the document
///
/// Maps serialize in key order, so two documents that differ only in YAML
/// key order share a digest.
///
/// # Errors
/// `Serialization` if the document cannot be encoded as JSON.
pub fn compute_document_digest(document: &ImportDocument) -> Result<String> {
    let canonical = serde_json::to_vec(document).map_err(document_serialization)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}
