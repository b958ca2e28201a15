//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RECONCILE_ID: &str = "reconcile_id";

// Object and rule identifiers
pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_NAME: &str = "name";
pub const FIELD_RULE: &str = "rule";
pub const FIELD_GENERATION: &str = "generation";

// Mutation sizes
pub const FIELD_REMOVED_LEN: &str = "removed_len";
pub const FIELD_APPLIED_LEN: &str = "applied_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
