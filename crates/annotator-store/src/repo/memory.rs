//! In-memory object repository
//!
//! A `BTreeMap`-backed repository behind a single mutex. Resource versions
//! start at 1 and increase by one on every write, matching
//! [`SqliteRepository`](super::SqliteRepository).

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use annotator_core::{ObjectKey, ObjectRepository, SourceObject, TargetObject};

use crate::errors::{conflict, not_found, Result};

#[derive(Debug, Default)]
struct Objects {
    targets: BTreeMap<ObjectKey, TargetObject>,
    sources: BTreeMap<ObjectKey, SourceObject>,
}

/// Thread-safe in-memory repository
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    objects: Mutex<Objects>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a target, ignoring its `resource_version`
    ///
    /// Returns the stored object with its new version.
    pub fn put_target(&self, target: TargetObject) -> TargetObject {
        let mut objects = self.lock();
        let version = objects
            .targets
            .get(&target.key)
            .map_or(1, |existing| existing.resource_version + 1);
        let stored = TargetObject {
            resource_version: version,
            ..target
        };
        objects.targets.insert(stored.key.clone(), stored.clone());
        stored
    }

    /// Create or replace the source object, ignoring its `resource_version`
    pub fn put_source(&self, source: SourceObject) -> SourceObject {
        let mut objects = self.lock();
        let version = objects
            .sources
            .get(&source.key)
            .map_or(1, |existing| existing.resource_version + 1);
        let stored = SourceObject {
            resource_version: version,
            ..source
        };
        objects.sources.insert(stored.key.clone(), stored.clone());
        stored
    }

    /// Delete a target; returns whether it existed
    pub fn remove_target(&self, key: &ObjectKey) -> bool {
        self.lock().targets.remove(key).is_some()
    }

    /// Delete the source object; returns whether it existed
    pub fn remove_source(&self, key: &ObjectKey) -> bool {
        self.lock().sources.remove(key).is_some()
    }

    pub fn target_count(&self) -> usize {
        self.lock().targets.len()
    }

    fn lock(&self) -> MutexGuard<'_, Objects> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectRepository for InMemoryRepository {
    fn get_target(&self, key: &ObjectKey) -> Result<TargetObject> {
        self.lock()
            .targets
            .get(key)
            .cloned()
            .ok_or_else(|| not_found("get_target", key))
    }

    fn list_targets(&self, namespace: Option<&str>) -> Result<Vec<TargetObject>> {
        Ok(self
            .lock()
            .targets
            .values()
            .filter(|target| namespace.map_or(true, |ns| target.key.namespace == ns))
            .cloned()
            .collect())
    }

    fn update_target(&self, object: &TargetObject) -> Result<TargetObject> {
        let mut objects = self.lock();
        let stored = objects
            .targets
            .get_mut(&object.key)
            .ok_or_else(|| not_found("update_target", &object.key))?;

        if stored.resource_version != object.resource_version {
            return Err(conflict(
                "update_target",
                &object.key,
                object.resource_version,
                stored.resource_version,
            ));
        }

        stored.annotations = object.annotations.clone();
        stored.resource_version += 1;
        Ok(stored.clone())
    }

    fn get_source(&self, key: &ObjectKey) -> Result<SourceObject> {
        self.lock()
            .sources
            .get(key)
            .cloned()
            .ok_or_else(|| not_found("get_source", key))
    }
}
