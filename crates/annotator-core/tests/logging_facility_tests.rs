#![allow(clippy::unwrap_used, clippy::expect_used)]

use annotator_core::errors::{AnnotatorError, ExError, ExErrorKind};
use annotator_core::logging_facility::test_capture::init_test_capture;
use annotator_core::{log_op_end, log_op_error, log_op_start, RawRule, Reconciler, RuleStore};
use annotator_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_events(|e| e.is(op_name, EVENT_START));
    assert_eq!(starts, 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event(), Some(EVENT_END));
    assert_eq!(events[0].duration_ms(), Some(42));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = AnnotatorError::Conflict {
        namespace: "default".to_string(),
        name: "web".to_string(),
        expected: 3,
        actual: 4,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Some(Level::ERROR));
    assert_eq!(event.event(), Some(EVENT_END_ERROR));
    assert_eq!(event.err_code(), Some("ERR_CONFLICT"));
    assert_eq!(event.field("err.kind"), Some("Conflict"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Persistence).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 1, namespace = "default");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].err_code(), Some("ERR_PERSISTENCE"));
    assert_eq!(events[0].field("namespace"), Some("default"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    log_op_start!(op_name, namespace = "default");
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
}

// The store logs under fixed op names; assert on fields unique to each test.

#[test]
fn test_rule_store_update_logs_generation() {
    let capture = init_test_capture();
    let store = RuleStore::new();

    store
        .update("logging-probe-rule:\n  namespace: logging-probe\n")
        .unwrap();

    let ends = capture.count_events(|e| {
        e.is("rules_update", EVENT_END) && e.u64_field("rule_count") == Some(1)
    });
    assert!(ends >= 1);
}

#[test]
fn test_rule_store_rejected_update_logs_validation_error() {
    let capture = init_test_capture();
    let store = RuleStore::new();

    let _ = store.update("bad:\n  namespace: Logging_Probe!\n");

    let errors = capture.count_events(|e| {
        e.is("rules_update", EVENT_END_ERROR)
            && e.field("message")
                .is_some_and(|m| m.contains("Logging_Probe!"))
    });
    assert!(errors >= 1);
    assert!(!capture
        .events_with_field(Level::ERROR, "err.code", "ERR_VALIDATION")
        .is_empty());
}

#[test]
fn test_undecodable_marker_logs_warning() {
    let capture = init_test_capture();
    let reconciler = Reconciler::new("probe.example.com/owned");
    let rules = annotator_core::RuleSet::from_raw(
        [(
            "r".to_string(),
            RawRule::new("warn-probe", "").with_annotation("k", "v"),
        )]
        .into_iter()
        .collect(),
        "probe.example.com/owned",
    )
    .unwrap();
    let current: annotator_core::Annotations =
        [("probe.example.com/owned".to_string(), "not-json".to_string())]
        .into_iter()
        .collect();

    let outcome = reconciler
        .reconcile("warn-probe", "web", &current, &rules)
        .unwrap();
    assert!(!outcome.is_unchanged());

    let warnings = capture.events_with_field(Level::WARN, "namespace", "warn-probe");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("key"), Some("probe.example.com/owned"));
}
