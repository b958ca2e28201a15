//! Reconcile command
//!
//! Usage: annotator reconcile --db <PATH> [--namespace NS] [--json]
//!
//! The source object location and provenance key come from the environment
//! (`POD_NAMESPACE`, `ANNOTATOR_SOURCE_NAME`, `ANNOTATOR_PROVENANCE_KEY`);
//! the flags below override them.

use std::path::PathBuf;
use std::sync::Arc;

use annotator_core::config::{ENV_POD_NAMESPACE, ENV_PROVENANCE_KEY, ENV_SOURCE_NAME};
use annotator_core::AnnotatorConfig;
use annotator_engine::{Annotator, BatchReport, ReconcileStatus};
use annotator_store::SqliteRepository;
use clap::Args;

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// SQLite database file
    #[arg(long)]
    pub db: PathBuf,

    /// Only reconcile targets in this namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Namespace of the source object
    #[arg(long)]
    pub source_namespace: Option<String>,

    /// Name of the source object
    #[arg(long)]
    pub source_name: Option<String>,

    /// Annotation key for the provenance marker
    #[arg(long)]
    pub provenance_key: Option<String>,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReconcileArgs {
    fn config(&self) -> annotator_core::Result<AnnotatorConfig> {
        AnnotatorConfig::from_lookup(|key| {
            let flag = match key {
                ENV_POD_NAMESPACE => self.source_namespace.clone(),
                ENV_SOURCE_NAME => self.source_name.clone(),
                ENV_PROVENANCE_KEY => self.provenance_key.clone(),
                _ => None,
            };
            flag.or_else(|| std::env::var(key).ok())
        })
    }
}

/// Execute reconcile
pub fn execute(args: ReconcileArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.db.exists() {
        return Err(format!("database {} does not exist", args.db.display()).into());
    }

    let config = args.config()?;
    let repo = Arc::new(SqliteRepository::open(&args.db)?);
    let annotator = Annotator::new(config, repo)?;

    let batch = match &args.namespace {
        Some(namespace) => annotator.reconcile_namespace(namespace)?,
        None => annotator.reconcile_all()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_summary(&batch);
    }

    check_conflicts(&batch)
}

/// Fail when any target conflicted, so scripts know to run again
fn check_conflicts(batch: &BatchReport) -> Result<(), Box<dyn std::error::Error>> {
    if batch.is_clean() {
        return Ok(());
    }
    Err(format!(
        "{} targets conflicted; run again to retry",
        batch.conflicts.len()
    )
    .into())
}

fn print_summary(batch: &BatchReport) {
    for report in &batch.reports {
        match &report.status {
            ReconcileStatus::Updated {
                removed, applied, ..
            } => println!(
                "updated {} (+{} -{})",
                report.target,
                applied.len(),
                removed.len()
            ),
            ReconcileStatus::Unchanged => println!("unchanged {}", report.target),
            ReconcileStatus::Missing => println!("missing {}", report.target),
        }
    }
    for key in &batch.conflicts {
        println!("conflict {}", key);
    }
    println!(
        "✓ {} updated, {} unchanged, {} conflicts",
        batch.updated(),
        batch.unchanged(),
        batch.conflicts.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_core::ObjectKey;

    #[test]
    fn test_clean_batch_succeeds() {
        assert!(check_conflicts(&BatchReport::default()).is_ok());
    }

    #[test]
    fn test_conflicts_fail_with_count() {
        let batch = BatchReport {
            reports: vec![],
            conflicts: vec![ObjectKey::new("default", "a"), ObjectKey::new("default", "b")],
        };

        let err = check_conflicts(&batch).unwrap_err();
        assert_eq!(err.to_string(), "2 targets conflicted; run again to retry");
    }

    #[test]
    fn test_flags_override_environment_lookup() {
        let args = ReconcileArgs {
            db: PathBuf::from("objects.db"),
            namespace: None,
            source_namespace: Some("system".to_string()),
            source_name: Some("rules".to_string()),
            provenance_key: None,
            json: false,
        };

        let config = args.config().unwrap();
        assert_eq!(config.source, ObjectKey::new("system", "rules"));
    }
}
