//! Provenance marker encoding
//!
//! The marker is a single annotation on the target whose value is the JSON
//! object of annotations the engine last computed for it. Keys are emitted in
//! sorted order.

use crate::errors::{AnnotatorError, Result};
use crate::model::Annotations;

/// Annotation key holding the marker unless configured otherwise
pub const DEFAULT_PROVENANCE_KEY: &str = "annotator.ingress.kubernetes.io/managed-annotations";

/// Decode a marker value
///
/// A missing or empty value is an empty mapping.
///
/// # Errors
/// `ProvenanceDecode` if the value is not a JSON object of strings.
pub fn decode(value: Option<&str>) -> Result<Annotations> {
    match value {
        None => Ok(Annotations::new()),
        Some(text) if text.is_empty() => Ok(Annotations::new()),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| AnnotatorError::ProvenanceDecode {
                message: e.to_string(),
            })
        }
    }
}

/// Encode a marker value
///
/// # Errors
/// `ProvenanceEncode` if serialization fails.
pub fn encode(annotations: &Annotations) -> Result<String> {
    serde_json::to_string(annotations).map_err(|e| AnnotatorError::ProvenanceEncode {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_decode_to_empty() {
        assert!(decode(None).unwrap().is_empty());
        assert!(decode(Some("")).unwrap().is_empty());
        assert!(decode(Some("{}")).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        assert!(matches!(
            decode(Some("invalid-json")),
            Err(AnnotatorError::ProvenanceDecode { .. })
        ));
    }

    #[test]
    fn test_non_string_values_are_decode_error() {
        assert!(matches!(
            decode(Some(r#"{"a": 1}"#)),
            Err(AnnotatorError::ProvenanceDecode { .. })
        ));
    }

    #[test]
    fn test_encode_is_sorted_json() {
        let mut annotations = Annotations::new();
        annotations.insert("z".to_string(), "1".to_string());
        annotations.insert("a".to_string(), "2".to_string());
        assert_eq!(encode(&annotations).unwrap(), r#"{"a":"2","z":"1"}"#);
    }
}
