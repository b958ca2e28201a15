//! The annotator: rule store, reconciler and repository wired together

#![allow(clippy::result_large_err)]

use std::sync::Arc;
use std::time::Instant;

use annotator_core::errors::ExError;
use annotator_core::{
    log_op_end, log_op_error, log_op_start, AnnotatorConfig, ObjectKey, ObjectRepository,
    ReconcileOutcome, Reconciler, RuleSet, RuleStore,
};
use annotator_core_types::ReconcileId;

use crate::report::{BatchReport, ReconcileReport, ReconcileStatus};

type Result<T> = std::result::Result<T, ExError>;

/// Keeps targets annotated according to the policy in the source object
pub struct Annotator {
    config: AnnotatorConfig,
    repo: Arc<dyn ObjectRepository>,
    rules: RuleStore,
    reconciler: Reconciler,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("config", &self.config)
            .field("generation", &self.rules.generation())
            .finish_non_exhaustive()
    }
}

impl Annotator {
    /// Load the policy from the configured source object and build the
    /// annotator
    ///
    /// # Errors
    /// `NotFound` when the source object is missing; `Parse` or `Validation`
    /// when its policy is invalid.
    pub fn new(config: AnnotatorConfig, repo: Arc<dyn ObjectRepository>) -> Result<Self> {
        let start = Instant::now();
        log_op_start!(
            "annotator_start",
            namespace = config.source.namespace.as_str(),
            name = config.source.name.as_str()
        );

        let built = repo
            .get_source(&config.source)
            .map_err(|err| err.with_op("annotator_start"))
            .and_then(|source| {
                RuleStore::from_source(&source, &config.provenance_key).map_err(ExError::from)
            });
        let duration_ms = start.elapsed().as_millis() as u64;

        match built {
            Ok(rules) => {
                log_op_end!(
                    "annotator_start",
                    duration_ms = duration_ms,
                    rule_count = rules.get().len() as u64
                );
                let reconciler = Reconciler::new(config.provenance_key.clone());
                Ok(Self {
                    config,
                    repo,
                    rules,
                    reconciler,
                })
            }
            Err(err) => {
                log_op_error!("annotator_start", err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Whether `key` names the object carrying the policy
    pub fn is_source(&self, key: &ObjectKey) -> bool {
        *key == self.config.source
    }

    /// Re-read the source object and publish its rules
    ///
    /// Returns the generation this reload published. On any failure the
    /// previous rule set stays in effect.
    ///
    /// # Errors
    /// `NotFound` if the source object is gone; `Parse` or `Validation` for
    /// an invalid policy.
    pub fn reload_rules(&self) -> Result<u64> {
        let source = self
            .repo
            .get_source(&self.config.source)
            .map_err(|err| err.with_op("reload_rules"))?;
        self.rules
            .update_from_entries(&source.data)
            .map_err(ExError::from)
    }

    /// Converge one target
    ///
    /// A missing target is not an error; it reports `Missing`.
    ///
    /// # Errors
    /// `Conflict` when the target changed between read and write (re-run to
    /// retry against fresh state); `Encode` or repository failures otherwise.
    pub fn reconcile_target(&self, key: &ObjectKey) -> Result<ReconcileReport> {
        let reconcile_id = ReconcileId::new();
        let start = Instant::now();
        log_op_start!(
            "reconcile_target",
            reconcile_id = reconcile_id.as_str(),
            namespace = key.namespace.as_str(),
            name = key.name.as_str()
        );

        let (rule_set, generation) = self.rules.snapshot();
        let result = self.converge(key, &rule_set);
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(status) => {
                let (removed_len, applied_len) = match &status {
                    ReconcileStatus::Updated {
                        removed, applied, ..
                    } => (removed.len() as u64, applied.len() as u64),
                    _ => (0, 0),
                };
                log_op_end!(
                    "reconcile_target",
                    duration_ms = duration_ms,
                    reconcile_id = reconcile_id.as_str(),
                    generation = generation,
                    removed_len = removed_len,
                    applied_len = applied_len
                );
                Ok(ReconcileReport {
                    reconcile_id,
                    target: key.clone(),
                    generation,
                    status,
                })
            }
            Err(err) => {
                log_op_error!(
                    "reconcile_target",
                    err.clone(),
                    duration_ms = duration_ms,
                    reconcile_id = reconcile_id.as_str(),
                    generation = generation
                );
                Err(err)
            }
        }
    }

    /// Converge every target in `namespace`
    ///
    /// # Errors
    /// Listing failures, or any per-target failure other than `Conflict`.
    pub fn reconcile_namespace(&self, namespace: &str) -> Result<BatchReport> {
        self.reconcile_batch(Some(namespace))
    }

    /// Converge every target
    ///
    /// # Errors
    /// See [`Annotator::reconcile_namespace`].
    pub fn reconcile_all(&self) -> Result<BatchReport> {
        self.reconcile_batch(None)
    }

    fn reconcile_batch(&self, namespace: Option<&str>) -> Result<BatchReport> {
        let targets = self.repo.list_targets(namespace)?;
        tracing::debug!(
            namespace = namespace.unwrap_or("*"),
            targets = targets.len() as u64,
            "reconciling batch"
        );

        let mut batch = BatchReport::default();
        for target in targets {
            match self.reconcile_target(&target.key) {
                Ok(report) => batch.reports.push(report),
                Err(err) if err.is_conflict() => batch.conflicts.push(target.key),
                Err(err) => return Err(err),
            }
        }
        Ok(batch)
    }

    fn converge(&self, key: &ObjectKey, rule_set: &RuleSet) -> Result<ReconcileStatus> {
        let mut target = match self.repo.get_target(key) {
            Ok(target) => target,
            Err(err) if err.is_not_found() => return Ok(ReconcileStatus::Missing),
            Err(err) => return Err(err),
        };

        let outcome = self
            .reconciler
            .reconcile(&key.namespace, &key.name, &target.annotations, rule_set)
            .map_err(|err| ExError::from(err).with_object(key.clone()))?;

        let mutation = match outcome {
            ReconcileOutcome::Unchanged => return Ok(ReconcileStatus::Unchanged),
            ReconcileOutcome::Changed(mutation) => mutation,
        };

        mutation.apply_to(&mut target.annotations);
        match self.repo.update_target(&target) {
            Ok(updated) => Ok(ReconcileStatus::Updated {
                removed: mutation.remove,
                applied: mutation.apply,
                resource_version: updated.resource_version,
            }),
            Err(err) if err.is_not_found() => Ok(ReconcileStatus::Missing),
            Err(err) => Err(err),
        }
    }
}
