//! Core types shared across annotator crates
//!
//! This crate provides foundational types used by the matching engine,
//! the object repositories and the logging facility:
//!
//! - **Object identity**: `ObjectKey` (namespace + name)
//! - **Correlation types**: `ReconcileId` for tying log lines of one pass together
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod object_key;
pub mod schema;

pub use correlation::ReconcileId;
pub use object_key::ObjectKey;
