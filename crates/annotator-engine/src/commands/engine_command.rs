//! Engine-level commands, one per kind of observed event.

#![allow(clippy::result_large_err)]

use annotator_core::errors::ExError;
use annotator_core::ObjectKey;

use crate::annotator::Annotator;
use crate::report::{BatchReport, ReconcileReport};

/// Something the caller observed and wants converged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// The source object changed: reload rules, then reconcile every target.
    SourceChanged,
    /// A target was created or updated.
    TargetObserved { key: ObjectKey },
    /// A namespace was created or updated: reconcile the targets inside it.
    NamespaceObserved { namespace: String },
    /// Periodic full pass.
    ReconcileAll,
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    /// Rules were reloaded and all targets reconciled against them.
    SourceReloaded { generation: u64, batch: BatchReport },
    Target(ReconcileReport),
    Batch(BatchReport),
}

impl EngineCommand {
    /// Classify a change to `key`: the source object or a target
    pub fn for_object(annotator: &Annotator, key: ObjectKey) -> Self {
        if annotator.is_source(&key) {
            EngineCommand::SourceChanged
        } else {
            EngineCommand::TargetObserved { key }
        }
    }
}

/// Apply an engine command.
///
/// A rejected policy on `SourceChanged` is returned as an error and no
/// target is touched; the previous rule set stays live.
pub fn apply_engine_command(
    annotator: &Annotator,
    cmd: EngineCommand,
) -> Result<EngineCommandResult, ExError> {
    match cmd {
        EngineCommand::SourceChanged => {
            let generation = annotator.reload_rules()?;
            let batch = annotator.reconcile_all()?;
            Ok(EngineCommandResult::SourceReloaded { generation, batch })
        }
        EngineCommand::TargetObserved { key } => annotator
            .reconcile_target(&key)
            .map(EngineCommandResult::Target),
        EngineCommand::NamespaceObserved { namespace } => annotator
            .reconcile_namespace(&namespace)
            .map(EngineCommandResult::Batch),
        EngineCommand::ReconcileAll => annotator.reconcile_all().map(EngineCommandResult::Batch),
    }
}
