//! Import parser with validation
//!
//! Parses YAML and validates schema version, object keys and target
//! uniqueness

#![allow(clippy::result_large_err)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use annotator_core::ObjectKey;

use crate::errors::{import_validation, io_error, Result};
use crate::import::document::ImportDocument;

/// Parse an import file from a path
pub fn parse_import_file(path: &Path) -> Result<ImportDocument> {
    let content = fs::read_to_string(path).map_err(|e| io_error("import_read", e))?;
    parse_import_str(&content)
}

/// Parse an import document from a string
pub fn parse_import_str(content: &str) -> Result<ImportDocument> {
    let document: ImportDocument = serde_yaml::from_str(content)
        .map_err(|e| import_validation(&format!("YAML parse error: {}", e)))?;

    validate_document(&document)?;

    Ok(document)
}

fn validate_document(document: &ImportDocument) -> Result<()> {
    if document.schema_version != 0 {
        return Err(import_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            document.schema_version
        )));
    }

    if let Some(source) = &document.source {
        validate_key("source", &source.key)?;
    }

    let mut seen = HashSet::new();
    for target in &document.targets {
        validate_key("target", &target.key)?;
        if !seen.insert(&target.key) {
            return Err(import_validation(&format!(
                "Duplicate target {}",
                target.key
            )));
        }
    }

    Ok(())
}

fn validate_key(kind: &str, key: &ObjectKey) -> Result<()> {
    if key.namespace.trim().is_empty() || key.name.trim().is_empty() {
        return Err(import_validation(&format!(
            "{} object needs a namespace and a name, got {:?}",
            kind,
            key.to_string()
        )));
    }
    Ok(())
}
