//! Annotator Store - object repositories and import
//!
//! Provides:
//! - `InMemoryRepository` for tests and embedding
//! - `SqliteRepository` backed by an embedded, migrated SQLite schema
//! - YAML import of a source object and target objects

pub mod db;
pub mod errors;
pub mod import;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use import::{import_document, import_file, ImportDocument, ImportSummary};
pub use repo::{InMemoryRepository, SqliteRepository};
