// Optimistic concurrency across independent connections to one file

use annotator_core::{ObjectKey, ObjectRepository, TargetObject};
use annotator_store::SqliteRepository;

#[test]
fn test_write_from_other_connection_is_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("objects.db");

    let ours = SqliteRepository::open(&path).unwrap();
    let theirs = SqliteRepository::open(&path).unwrap();

    let key = ObjectKey::new("default", "web");
    ours.put_target(&TargetObject::new(key.clone())).unwrap();

    let mut read = ours.get_target(&key).unwrap();

    let mut concurrent = theirs.get_target(&key).unwrap();
    concurrent
        .annotations
        .insert("owner".to_string(), "someone-else".to_string());
    theirs.update_target(&concurrent).unwrap();

    read.annotations.insert("team".to_string(), "web".to_string());
    let err = ours.update_target(&read).unwrap_err();
    assert!(err.is_conflict());

    // re-read and retry succeeds on fresh state
    let mut fresh = ours.get_target(&key).unwrap();
    fresh.annotations.insert("team".to_string(), "web".to_string());
    let updated = ours.update_target(&fresh).unwrap();

    assert_eq!(updated.resource_version, 3);
    assert_eq!(
        theirs.get_target(&key).unwrap().annotations.len(),
        2,
        "both writes visible"
    );
}
