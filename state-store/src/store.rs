//! Store abstractions
//!
//! [`LedgerState`] is the handle the core operates against during one
//! invocation. [`CommitStore`] is the committed state behind it,
//! keyed by [`StateKey`] across the two namespaces.

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;

/// Separator between collection and key in the private namespace.
/// Collection and key names must not contain it.
const KEY_SEPARATOR: u8 = 0x00;

/// Namespace-qualified state key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// World state, visible to all participants
    World(String),
    /// Private data collection, visible only to its members
    Private {
        /// Collection name
        collection: String,
        /// Key within the collection
        key: String,
    },
}

impl StateKey {
    /// Key in the world state namespace
    pub fn world(key: impl Into<String>) -> Self {
        StateKey::World(key.into())
    }

    /// Key in a private data collection
    pub fn private(collection: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let key = key.into();

        if collection.is_empty() {
            return Err(Error::InvalidKey("empty collection name".to_string()));
        }
        if collection.bytes().chain(key.bytes()).any(|b| b == KEY_SEPARATOR) {
            return Err(Error::InvalidKey(
                "collection and key must not contain NUL".to_string(),
            ));
        }

        Ok(StateKey::Private { collection, key })
    }

    /// Stable byte encoding used by backing stores
    pub fn encoded(&self) -> Vec<u8> {
        match self {
            StateKey::World(key) => key.as_bytes().to_vec(),
            StateKey::Private { collection, key } => {
                let mut encoded = collection.as_bytes().to_vec();
                encoded.push(KEY_SEPARATOR);
                encoded.extend_from_slice(key.as_bytes());
                encoded
            }
        }
    }
}

/// Buffered writes of one invocation, applied atomically on commit
#[derive(Debug, Default, Clone)]
pub struct WriteSet {
    entries: BTreeMap<StateKey, Vec<u8>>,
}

impl WriteSet {
    /// Create an empty write set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write; a later write to the same key wins
    pub fn insert(&mut self, key: StateKey, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Pending value for a key, if one was written
    pub fn get(&self, key: &StateKey) -> Option<&Vec<u8>> {
        self.entries.get(key)
    }

    /// Number of pending writes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no pending writes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over pending writes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &Vec<u8>)> {
        self.entries.iter()
    }
}

impl IntoIterator for WriteSet {
    type Item = (StateKey, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<StateKey, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Committed state behind a transaction.
///
/// `apply` must be atomic: either every write in the set becomes
/// visible or none does.
pub trait CommitStore: Send + Sync {
    /// Read a committed value; absent keys are `Ok(None)`
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>>;

    /// Apply a whole write set atomically
    fn apply(&self, writes: WriteSet) -> Result<()>;
}

/// Per-invocation read/write handle the ledger core operates against.
///
/// Store calls may suspend (the committed state can live across a
/// network round-trip); within one invocation they are always awaited
/// sequentially, never issued concurrently.
#[async_trait]
pub trait LedgerState: Send + Sync {
    /// Read a public balance entry; absent keys are `Ok(None)`
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write a public balance entry
    async fn put_state(&self, key: &str, value: Bytes) -> Result<()>;

    /// Read an entry from a private data collection; absent is `Ok(None)`
    async fn get_private(&self, collection: &str, key: &str) -> Result<Option<Bytes>>;

    /// Write an entry to a private data collection
    async fn put_private(&self, collection: &str, key: &str, value: Bytes) -> Result<()>;
}
