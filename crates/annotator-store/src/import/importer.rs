//! Importer orchestration
//!
//! Writes the source object and every target in one transaction and records
//! the run in `import_log`. Re-importing an object replaces its payload and
//! bumps its resource version.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Instant;

use annotator_core::{log_op_end, log_op_error, log_op_start, ObjectKey};

use crate::errors::{from_rusqlite, Result};
use crate::import::document::{compute_document_digest, ImportDocument};
use crate::import::parser::parse_import_file;
use crate::repo::sqlite_repo::{upsert_source, upsert_target};
use crate::repo::SqliteRepository;

/// What an import wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Digest of the imported document
    pub digest: String,
    pub source: Option<ObjectKey>,
    pub targets: usize,
}

/// Parse, validate and import a YAML file
pub fn import_file(repo: &SqliteRepository, path: &Path) -> Result<ImportSummary> {
    let document = parse_import_file(path)?;
    import_document(repo, &document)
}

/// Import an already parsed document
pub fn import_document(repo: &SqliteRepository, document: &ImportDocument) -> Result<ImportSummary> {
    let start = Instant::now();
    let digest = compute_document_digest(document)?;
    log_op_start!("import", digest = digest.as_str());

    let result = repo.with_transaction(|tx| {
        if let Some(source) = &document.source {
            upsert_source(tx, source)?;
        }
        for target in &document.targets {
            upsert_target(tx, target)?;
        }

        tx.execute(
            "INSERT INTO import_log (digest, target_count, has_source, imported_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                digest,
                document.targets.len() as i64,
                document.source.is_some(),
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(ImportSummary {
            digest: digest.clone(),
            source: document.source.as_ref().map(|s| s.key.clone()),
            targets: document.targets.len(),
        })
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(summary) => log_op_end!(
            "import",
            duration_ms = duration_ms,
            targets = summary.targets as u64
        ),
        Err(err) => log_op_error!("import", err.clone(), duration_ms = duration_ms),
    }
    result
}
