//! Confidential transfer ledger core
//!
//! State-transition logic for a two-tier asset ledger: every account
//! has a public balance in replicated world state, and transfers move
//! value from a source's public balance into a destination's balance
//! inside a private data collection. The transfer parameters travel
//! only through the per-invocation transient channel, so neither the
//! amount nor the counterparties ever reach the replicated
//! transaction record.
//!
//! # Operations
//!
//! - **Initialize**: seed two public account balances
//! - **move**: confidential public-to-private transfer
//! - **query**: dual-visibility balance report
//!
//! # Invariants
//!
//! - A private balance with no entry reads as zero, never as an error
//! - The private write of a transfer is issued before the public one
//! - No conservation enforcement: a source balance may go negative

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod metrics;
pub mod service;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use service::LedgerService;
pub use types::{
    AccountId, QueryRequest, QueryResponse, Response, TransferRequest, PRIVATE_BALANCE_NA,
};
