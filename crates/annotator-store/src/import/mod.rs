//! Object import
//!
//! Provides:
//! - The YAML import document (a source object plus target objects)
//! - Parser with validation
//! - Importer writing everything in one transaction

pub mod document;
pub mod importer;
pub mod parser;

pub use document::{compute_document_digest, ImportDocument};
pub use importer::{import_document, import_file, ImportSummary};
pub use parser::{parse_import_file, parse_import_str};
