//! State access tier for the confidential ledger
//!
//! Two key-value namespaces back the ledger: the replicated world
//! state visible to every participant, and private data collections
//! visible only to their members. The core never talks to a backing
//! store directly; each invocation receives a [`Transaction`] handle
//! that buffers writes and commits them atomically at the end of the
//! invocation.
//!
//! # Components
//!
//! - [`LedgerState`] - per-invocation read/write handle
//! - [`TransientMap`] - caller-supplied parameters, never persisted
//! - [`CommitStore`] - committed state (RocksDB or in-memory)
//! - [`Transaction`] - read-your-writes simulation + atomic commit

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod memory;
pub mod rocks;
pub mod store;
pub mod transaction;
pub mod transient;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use store::{CommitStore, LedgerState, StateKey, WriteSet};
pub use transaction::Transaction;
pub use transient::TransientMap;
