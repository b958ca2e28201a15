//! Error handling for annotator-store
//!
//! Wraps annotator-core ExError with store-specific helpers

use annotator_core::errors::{AnnotatorError, ExError, ExErrorKind};
use annotator_core::ObjectKey;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Object missing from the repository
pub fn not_found(op: &str, key: &ObjectKey) -> ExError {
    ExError::from(AnnotatorError::ObjectNotFound {
        namespace: key.namespace.clone(),
        name: key.name.clone(),
    })
    .with_op(op)
}

/// Stale resource version on update
pub fn conflict(op: &str, key: &ObjectKey, expected: u64, actual: u64) -> ExError {
    ExError::from(AnnotatorError::Conflict {
        namespace: key.namespace.clone(),
        name: key.name.clone(),
        expected,
        actual,
    })
    .with_op(op)
}

/// Create an import validation error
pub fn import_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("import_parse")
        .with_message(reason.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Stored payload could not be (de)serialized
pub fn serialization(key: &ObjectKey, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("object_payload")
        .with_object(key.clone())
        .with_message(err.to_string())
}

/// Import document could not be serialized for its digest
pub fn document_serialization(err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("import_digest")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_helper_keeps_kind_and_op() {
        let err = conflict("update_target", &ObjectKey::new("default", "web"), 2, 3);
        assert!(err.is_conflict());
        assert_eq!(err.op(), Some("update_target"));
        assert_eq!(err.object(), Some(&ObjectKey::new("default", "web")));
    }

    #[test]
    fn test_document_serialization_helper() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = document_serialization(json_err);
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.op(), Some("import_digest"));
        assert!(err.object().is_none());
    }

    #[test]
    fn test_not_found_helper() {
        let err = not_found("get_target", &ObjectKey::new("default", "gone"));
        assert!(err.is_not_found());
        assert_eq!(err.code(), "ERR_NOT_FOUND");
    }
}
