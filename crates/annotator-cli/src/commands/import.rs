//! Object import command
//!
//! Usage: annotator import --db <PATH> <FILE|DIR>

use std::path::PathBuf;

use annotator_store::{import_file, SqliteRepository};
use clap::Args;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to an import YAML file, or a directory of them
    pub path: PathBuf,

    /// SQLite database file (created if missing)
    #[arg(long)]
    pub db: PathBuf,
}

/// Execute import
pub fn execute(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let repo = SqliteRepository::open(&args.db)?;

    let files = if args.path.is_dir() {
        // Sorted for determinism
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for file in files {
        println!("Importing {}...", file.display());
        let summary = import_file(&repo, &file)?;
        println!(
            "✓ Imported {} targets{} (digest: {})",
            summary.targets,
            summary
                .source
                .map(|key| format!(" and source {}", key))
                .unwrap_or_default(),
            summary.digest
        );
    }

    Ok(())
}
