//! Command orchestration layer.
//!
//! Maps observed object events onto annotator operations.

pub mod engine_command;

pub use engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
