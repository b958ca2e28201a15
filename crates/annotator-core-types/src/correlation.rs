//! Correlation types for reconcile tracking
//!
//! A `ReconcileId` is minted per reconcile pass so that every log line
//! emitted while converging one target (or one namespace fan-out) can be
//! grouped together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single reconcile pass
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReconcileId(String);

impl ReconcileId {
    /// Generate a new random ReconcileId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ReconcileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReconcileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_id_generation() {
        let id1 = ReconcileId::new();
        let id2 = ReconcileId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_reconcile_id_display() {
        let id = ReconcileId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_serialization() {
        let id = ReconcileId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ReconcileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
