#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use annotator_core::errors::ExError;
use annotator_core::{
    AnnotatorConfig, Annotations, ObjectKey, ObjectRepository, SourceObject, TargetObject,
};
use annotator_engine::Annotator;
use annotator_store::InMemoryRepository;

pub fn source_key() -> ObjectKey {
    ObjectKey::new("system", "ingress-annotator")
}

pub fn annotations(pairs: &[(&str, &str)]) -> Annotations {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Repository holding a source with the given rule entries
pub fn repo_with_rules(entries: &[(&str, &str)]) -> Arc<InMemoryRepository> {
    let repo = Arc::new(InMemoryRepository::new());
    set_rules(&repo, entries);
    repo
}

pub fn set_rules(repo: &InMemoryRepository, entries: &[(&str, &str)]) {
    let source = entries
        .iter()
        .fold(SourceObject::new(source_key()), |source, (name, text)| {
            source.with_entry(*name, *text)
        });
    repo.put_source(source);
}

pub fn add_target(repo: &InMemoryRepository, namespace: &str, name: &str, pairs: &[(&str, &str)]) {
    repo.put_target(
        TargetObject::new(ObjectKey::new(namespace, name)).with_annotations(annotations(pairs)),
    );
}

pub fn start(repo: Arc<dyn ObjectRepository>) -> Annotator {
    Annotator::new(AnnotatorConfig::new(source_key()), repo).unwrap()
}

/// Repository that lets a competing writer slip in before each of the first
/// `conflicts` target updates
pub struct ContendedRepository {
    inner: InMemoryRepository,
    conflicts: AtomicUsize,
}

impl ContendedRepository {
    pub fn new(inner: InMemoryRepository, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(conflicts),
        }
    }

    pub fn inner(&self) -> &InMemoryRepository {
        &self.inner
    }
}

impl ObjectRepository for ContendedRepository {
    fn get_target(&self, key: &ObjectKey) -> Result<TargetObject, ExError> {
        self.inner.get_target(key)
    }

    fn list_targets(&self, namespace: Option<&str>) -> Result<Vec<TargetObject>, ExError> {
        self.inner.list_targets(namespace)
    }

    fn update_target(&self, object: &TargetObject) -> Result<TargetObject, ExError> {
        let contend = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if contend {
            let current = self.inner.get_target(&object.key)?;
            self.inner.put_target(current);
        }
        self.inner.update_target(object)
    }

    fn get_source(&self, key: &ObjectKey) -> Result<SourceObject, ExError> {
        self.inner.get_source(key)
    }
}

/// Repository where the target disappears between the reconciler's read and
/// its write
pub struct VanishingRepository {
    inner: InMemoryRepository,
}

impl VanishingRepository {
    pub fn new(inner: InMemoryRepository) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &InMemoryRepository {
        &self.inner
    }
}

impl ObjectRepository for VanishingRepository {
    fn get_target(&self, key: &ObjectKey) -> Result<TargetObject, ExError> {
        self.inner.get_target(key)
    }

    fn list_targets(&self, namespace: Option<&str>) -> Result<Vec<TargetObject>, ExError> {
        self.inner.list_targets(namespace)
    }

    fn update_target(&self, object: &TargetObject) -> Result<TargetObject, ExError> {
        self.inner.remove_target(&object.key);
        self.inner.update_target(object)
    }

    fn get_source(&self, key: &ObjectKey) -> Result<SourceObject, ExError> {
        self.inner.get_source(key)
    }
}
