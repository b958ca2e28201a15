//! Annotator Engine - Orchestration layer
//!
//! Wires object events to the rule store and the reconciler. Every reconcile
//! reads fresh state through an `ObjectRepository`, computes the mutation
//! against one rule set snapshot and writes it back in a single update.

pub mod annotator;
pub mod commands;
pub mod report;

pub use annotator::Annotator;
pub use commands::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use report::{BatchReport, ReconcileReport, ReconcileStatus};
