//! In-memory backing store
//!
//! Holds committed state in a single map guarded by a lock, so
//! `apply` is trivially atomic. Used by tests and the property
//! suite; the durable equivalent is [`crate::RocksStore`].

use crate::error::Result;
use crate::store::{CommitStore, StateKey, WriteSet};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory committed state
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<StateKey, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed entries, both namespaces
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no committed entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of committed world-state entries, for assertions
    pub fn world_entries(&self) -> Vec<(String, Vec<u8>)> {
        self.entries
            .read()
            .iter()
            .filter_map(|(k, v)| match k {
                StateKey::World(key) => Some((key.clone(), v.clone())),
                StateKey::Private { .. } => None,
            })
            .collect()
    }
}

impl CommitStore for MemoryStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn apply(&self, writes: WriteSet) -> Result<()> {
        let mut entries = self.entries.write();
        for (key, value) in writes {
            entries.insert(key, value);
        }
        Ok(())
    }
}
