#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use annotator_core::logging_facility::test_capture::init_test_capture;
use annotator_core::ObjectKey;
use annotator_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use common::*;

#[test]
fn test_reconcile_target_logs_start_and_end_with_reconcile_id() {
    let capture = init_test_capture();
    let repo = repo_with_rules(&[("r", "namespace: log-probe\nannotations:\n  k: v\n")]);
    add_target(&repo, "log-probe", "one", &[]);
    let annotator = start(repo);

    let report = annotator
        .reconcile_target(&ObjectKey::new("log-probe", "one"))
        .unwrap();

    let events = capture.for_reconcile(report.reconcile_id.as_str());
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
    assert!(events.iter().all(|e| e.op() == Some("reconcile_target")));
    assert_eq!(events[1].applied_len(), Some(1));
    assert_eq!(events[1].removed_len(), Some(0));
    assert_eq!(events[1].generation(), Some(1));
}

#[test]
fn test_conflict_logs_error_code() {
    let capture = init_test_capture();
    let inner = annotator_store::InMemoryRepository::new();
    set_rules(&inner, &[("r", "namespace: conflict-probe\nannotations:\n  k: v\n")]);
    add_target(&inner, "conflict-probe", "one", &[]);
    let annotator = start(std::sync::Arc::new(ContendedRepository::new(inner, 1)));

    assert!(annotator
        .reconcile_target(&ObjectKey::new("conflict-probe", "one"))
        .is_err());

    let errors = capture.count_events(|e| {
        e.is("reconcile_target", EVENT_END_ERROR)
            && e.err_code() == Some("ERR_CONFLICT")
            && e.field("message")
                .is_some_and(|m| m.contains("conflict-probe/one"))
    });
    assert_eq!(errors, 1);
}
