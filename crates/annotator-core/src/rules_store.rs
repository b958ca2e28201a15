//! Rule store: the single published rule set snapshot
//!
//! Updates parse and validate off to the side and only take the write lock
//! to swap the `Arc`. Readers clone the `Arc` and release the lock at once,
//! so a reconcile sees either the old or the new rule set, never a mix.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use crate::errors::Result;
use crate::model::{RawRule, SourceObject};
use crate::policy::{parse_policy, parse_policy_entries};
use crate::reconcile::DEFAULT_PROVENANCE_KEY;
use crate::rules::RuleSet;
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Clone)]
struct Published {
    rule_set: Arc<RuleSet>,
    generation: u64,
}

/// Holder of the live rule set
#[derive(Debug)]
pub struct RuleStore {
    published: RwLock<Published>,
    reserved_key: String,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// An empty store (generation 0) reserving the default provenance key
    pub fn new() -> Self {
        Self::with_reserved_key(DEFAULT_PROVENANCE_KEY)
    }

    /// An empty store rejecting rules that write `reserved_key`
    pub fn with_reserved_key(reserved_key: impl Into<String>) -> Self {
        Self {
            published: RwLock::new(Published {
                rule_set: Arc::new(RuleSet::empty()),
                generation: 0,
            }),
            reserved_key: reserved_key.into(),
        }
    }

    /// Build a store whose first snapshot comes from `policy_text`
    ///
    /// # Errors
    /// Parse or validation errors; no store is created.
    pub fn from_policy(policy_text: &str) -> Result<Self> {
        let store = Self::new();
        store.update(policy_text)?;
        Ok(store)
    }

    /// Build a store from a source object's entries
    ///
    /// # Errors
    /// Parse or validation errors of any entry; no store is created.
    pub fn from_source(source: &SourceObject, reserved_key: &str) -> Result<Self> {
        let store = Self::with_reserved_key(reserved_key);
        store.update_from_entries(&source.data)?;
        Ok(store)
    }

    /// Current snapshot. Never blocks for longer than an `Arc` clone.
    pub fn get(&self) -> Arc<RuleSet> {
        Arc::clone(&self.read().rule_set)
    }

    /// Snapshot together with the generation that published it
    pub fn snapshot(&self) -> (Arc<RuleSet>, u64) {
        let published = self.read();
        (Arc::clone(&published.rule_set), published.generation)
    }

    /// Number of successful publications so far
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    pub fn reserved_key(&self) -> &str {
        &self.reserved_key
    }

    /// Replace the snapshot with the rules in a policy document
    ///
    /// Returns the generation this call published.
    ///
    /// # Errors
    /// Parse or validation errors. The previous snapshot stays published.
    pub fn update(&self, policy_text: &str) -> Result<u64> {
        self.publish_with("rules_update", || parse_policy(policy_text))
    }

    /// Replace the snapshot with the rules in per-rule entries
    ///
    /// Returns the generation this call published.
    ///
    /// # Errors
    /// Parse or validation errors. The previous snapshot stays published.
    pub fn update_from_entries(&self, entries: &BTreeMap<String, String>) -> Result<u64> {
        self.publish_with("rules_update_entries", || parse_policy_entries(entries))
    }

    fn publish_with<F>(&self, op: &'static str, parse: F) -> Result<u64>
    where
        F: FnOnce() -> Result<BTreeMap<String, RawRule>>,
    {
        let start = Instant::now();
        log_op_start!(op);

        let built = parse().and_then(|raw| RuleSet::from_raw(raw, &self.reserved_key));
        let duration_ms = start.elapsed().as_millis() as u64;

        match built {
            Ok(rule_set) => {
                let rule_count = rule_set.len();
                let generation = {
                    let mut published = self
                        .published
                        .write()
                        .unwrap_or_else(PoisonError::into_inner);
                    published.rule_set = Arc::new(rule_set);
                    published.generation += 1;
                    published.generation
                };
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    generation = generation,
                    rule_count = rule_count as u64
                );
                Ok(generation)
            }
            Err(err) => {
                log_op_error!(op, err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Published> {
        self.published.read().unwrap_or_else(PoisonError::into_inner)
    }
}
