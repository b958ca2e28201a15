//! Object repository seam
//!
//! The engine never talks to storage directly. Implementations must give
//! every object a `resource_version` and reject an update whose version does
//! not match the stored one with an `ExErrorKind::Conflict` error, so callers
//! can re-run the whole reconcile against fresh state.

use annotator_core_types::ObjectKey;

use crate::errors::ExError;
use crate::model::{SourceObject, TargetObject};

/// Read/write access to target objects and read access to the source object
pub trait ObjectRepository: Send + Sync {
    /// Fetch one target
    ///
    /// # Errors
    /// `NotFound` when no such target exists.
    #[allow(clippy::result_large_err)]
    fn get_target(&self, key: &ObjectKey) -> Result<TargetObject, ExError>;

    /// List targets, optionally restricted to one namespace, sorted by key
    ///
    /// # Errors
    /// Storage failures.
    #[allow(clippy::result_large_err)]
    fn list_targets(&self, namespace: Option<&str>) -> Result<Vec<TargetObject>, ExError>;

    /// Write a target's annotations
    ///
    /// `object.resource_version` must equal the stored version. On success
    /// the stored object is returned with its version incremented.
    ///
    /// # Errors
    /// `Conflict` on a version mismatch, `NotFound` if the target vanished.
    #[allow(clippy::result_large_err)]
    fn update_target(&self, object: &TargetObject) -> Result<TargetObject, ExError>;

    /// Fetch the source object carrying the policy
    ///
    /// # Errors
    /// `NotFound` when the source object does not exist.
    #[allow(clippy::result_large_err)]
    fn get_source(&self, key: &ObjectKey) -> Result<SourceObject, ExError>;
}
