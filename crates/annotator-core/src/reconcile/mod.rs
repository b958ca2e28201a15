//! Converging target annotations to what the rule set expects.

pub mod engine;
pub mod model;
pub mod provenance;

pub use engine::{expected_annotations, reconcile, Reconciler};
pub use model::{AnnotationMutation, ReconcileOutcome};
pub use provenance::DEFAULT_PROVENANCE_KEY;
