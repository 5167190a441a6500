//! Per-invocation transaction shim
//!
//! Models the host runtime's simulation semantics: writes issued
//! during an invocation land in a write set, reads see the write set
//! before the committed store (read-your-writes), and the whole set
//! is applied atomically on commit. The core itself never commits or
//! rolls back; the embedding process decides after the invocation
//! returns.

use crate::error::Result;
use crate::store::{CommitStore, LedgerState, StateKey, WriteSet};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// One invocation's view of the ledger state
pub struct Transaction {
    store: Arc<dyn CommitStore>,
    writes: RwLock<WriteSet>,
    tx_id: Uuid,
    started_at: DateTime<Utc>,
}

impl Transaction {
    /// Begin a transaction over committed state
    pub fn new(store: Arc<dyn CommitStore>) -> Self {
        let tx_id = Uuid::now_v7();
        tracing::debug!(%tx_id, "Transaction started");

        Self {
            store,
            writes: RwLock::new(WriteSet::new()),
            tx_id,
            started_at: Utc::now(),
        }
    }

    /// Transaction id (UUIDv7, time-ordered)
    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    /// When the transaction began
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of writes pending in this transaction
    pub fn pending_writes(&self) -> usize {
        self.writes.read().len()
    }

    /// Apply all pending writes to the committed store atomically
    pub fn commit(self) -> Result<()> {
        let writes = self.writes.into_inner();

        tracing::debug!(
            tx_id = %self.tx_id,
            write_count = writes.len(),
            "Transaction committing"
        );

        self.store.apply(writes)
    }

    /// Discard all pending writes
    pub fn abort(self) {
        let writes = self.writes.into_inner();
        tracing::debug!(
            tx_id = %self.tx_id,
            discarded = writes.len(),
            "Transaction aborted"
        );
    }

    fn read(&self, key: &StateKey) -> Result<Option<Bytes>> {
        if let Some(pending) = self.writes.read().get(key) {
            return Ok(Some(Bytes::copy_from_slice(pending)));
        }

        Ok(self.store.get(key)?.map(Bytes::from))
    }

    fn write(&self, key: StateKey, value: Bytes) {
        self.writes.write().insert(key, value.to_vec());
    }
}

#[async_trait]
impl LedgerState for Transaction {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        self.read(&StateKey::world(key))
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        self.write(StateKey::world(key), value);
        Ok(())
    }

    async fn get_private(&self, collection: &str, key: &str) -> Result<Option<Bytes>> {
        self.read(&StateKey::private(collection, key)?)
    }

    async fn put_private(&self, collection: &str, key: &str, value: Bytes) -> Result<()> {
        self.write(StateKey::private(collection, key)?, value);
        Ok(())
    }
}
