//! Annotator Core - policy matching and annotation reconciliation
//!
//! This crate provides the pure parts of the annotator:
//! - Pattern matching for rule namespaces and names
//! - Policy parsing and rule validation into an immutable `RuleSet`
//! - The `RuleStore` publishing the live rule set snapshot
//! - The reconciler computing minimal annotation mutations with provenance
//! - The `ObjectRepository` seam, error facility, logging facility and config
//!
//! Nothing here performs I/O; repositories live in `annotator-store` and the
//! event orchestration in `annotator-engine`.

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod reconcile;
pub mod repository;
pub mod rules;
pub mod rules_store;

#[doc(hidden)]
pub use annotator_core_types as core_types;

// Re-export commonly used types
pub use annotator_core_types::ObjectKey;
pub use config::AnnotatorConfig;
pub use errors::{AnnotatorError, ExError, ExErrorKind, Result};
pub use matcher::{matches, Pattern};
pub use model::{Annotations, RawRule, SourceObject, TargetObject};
pub use reconcile::{reconcile, AnnotationMutation, ReconcileOutcome, Reconciler};
pub use repository::ObjectRepository;
pub use rules::{Rule, RuleSet};
pub use rules_store::RuleStore;
