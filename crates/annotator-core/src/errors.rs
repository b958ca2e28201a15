use annotator_core_types::ObjectKey;
use thiserror::Error;

/// Result type alias using AnnotatorError
pub type Result<T> = std::result::Result<T, AnnotatorError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// log assertions, and CLI exit reporting. `Conflict` and `NotFound` are the
/// two kinds callers are expected to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Policy
    /// Policy text is not valid structured data
    Parse,
    /// A rule violates the pattern grammar or annotation constraints
    Validation,

    // Reconcile
    /// Provenance marker is not valid JSON (downgraded, never surfaced by the reconciler)
    ProvenanceDecode,
    /// Provenance marker could not be serialized
    Encode,

    // Repository
    NotFound,
    /// Target changed between read and write
    Conflict,
    Persistence,
    Io,
    Serialization,

    // Configuration / input
    InvalidInput,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::ProvenanceDecode => "ERR_PROVENANCE_DECODE",
            ExErrorKind::Encode => "ERR_ENCODE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, object, rule) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    object: Option<ObjectKey>,
    rule: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            object: None,
            rule: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add object context
    pub fn with_object(mut self, key: ObjectKey) -> Self {
        self.object = Some(key);
        self
    }

    /// Add rule name context
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the object context, if any
    pub fn object(&self) -> Option<&ObjectKey> {
        self.object.as_ref()
    }

    /// Get the rule context, if any
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the target changed concurrently and the whole reconcile should be re-run
    pub fn is_conflict(&self) -> bool {
        self.kind == ExErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(object) = &self.object {
            write!(f, " (object: {})", object)?;
        }
        if let Some(rule) = &self.rule {
            write!(f, " (rule: {})", rule)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by the matching and reconciliation core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotatorError {
    // ===== Policy Errors =====
    /// Policy text is not valid YAML or has the wrong shape
    #[error("Failed to parse policy: {message}")]
    PolicyParse { message: String },

    /// A single source entry could not be parsed as a rule record
    #[error("Invalid data in policy entry {entry}: {message}")]
    EntryParse { entry: String, message: String },

    /// A pattern violates the grammar
    #[error("Invalid {field} pattern in rule {rule}: {pattern:?}")]
    InvalidPattern {
        rule: String,
        field: String,
        pattern: String,
    },

    /// A rule declares an annotation with an empty key
    #[error("Rule {rule} declares an annotation with an empty key")]
    EmptyAnnotationKey { rule: String },

    /// A rule tries to write the provenance marker key
    #[error("Rule {rule} sets reserved annotation key {key}")]
    ReservedAnnotationKey { rule: String, key: String },

    // ===== Provenance Errors =====
    /// Provenance marker is not a JSON string map
    #[error("Failed to decode provenance marker: {message}")]
    ProvenanceDecode { message: String },

    /// Provenance marker could not be serialized
    #[error("Failed to encode provenance marker: {message}")]
    ProvenanceEncode { message: String },

    // ===== Repository Errors =====
    /// Object does not exist
    #[error("Object not found: {namespace}/{name}")]
    ObjectNotFound { namespace: String, name: String },

    /// Object was modified since it was read
    #[error("Conflict updating {namespace}/{name}: expected resource version {expected}, found {actual}")]
    Conflict {
        namespace: String,
        name: String,
        expected: u64,
        actual: u64,
    },

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl AnnotatorError {
    /// Get the canonical error kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            AnnotatorError::PolicyParse { .. } | AnnotatorError::EntryParse { .. } => {
                ExErrorKind::Parse
            }
            AnnotatorError::InvalidPattern { .. }
            | AnnotatorError::EmptyAnnotationKey { .. }
            | AnnotatorError::ReservedAnnotationKey { .. } => ExErrorKind::Validation,
            AnnotatorError::ProvenanceDecode { .. } => ExErrorKind::ProvenanceDecode,
            AnnotatorError::ProvenanceEncode { .. } => ExErrorKind::Encode,
            AnnotatorError::ObjectNotFound { .. } => ExErrorKind::NotFound,
            AnnotatorError::Conflict { .. } => ExErrorKind::Conflict,
            AnnotatorError::InvalidConfig { .. } => ExErrorKind::InvalidInput,
        }
    }
}

impl From<AnnotatorError> for ExError {
    fn from(err: AnnotatorError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            AnnotatorError::PolicyParse { .. } => ExError::new(kind)
                .with_op("parse_policy")
                .with_message(message),

            AnnotatorError::EntryParse { entry, .. } => ExError::new(kind)
                .with_op("parse_policy_entry")
                .with_rule(entry)
                .with_message(message),

            AnnotatorError::InvalidPattern { rule, .. }
            | AnnotatorError::EmptyAnnotationKey { rule }
            | AnnotatorError::ReservedAnnotationKey { rule, .. } => ExError::new(kind)
                .with_op("validate_rule")
                .with_rule(rule)
                .with_message(message),

            AnnotatorError::ProvenanceDecode { .. } => ExError::new(kind)
                .with_op("decode_provenance")
                .with_message(message),

            AnnotatorError::ProvenanceEncode { .. } => ExError::new(kind)
                .with_op("encode_provenance")
                .with_message(message),

            AnnotatorError::ObjectNotFound { namespace, name }
            | AnnotatorError::Conflict {
                namespace, name, ..
            } => ExError::new(kind)
                .with_object(ObjectKey::new(namespace, name))
                .with_message(message),

            AnnotatorError::InvalidConfig { .. } => ExError::new(kind)
                .with_op("load_config")
                .with_message(message),
        }
    }
}
