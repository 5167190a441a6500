//! Error types for the ledger core

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every failure surfaces to the dispatcher as one of these; the core
/// never retries and never escalates to a process fault.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed invocation (wrong argument count, non-numeric balance)
    #[error("{0}")]
    InvalidArgument(String),

    /// Query on an account with no public balance
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Dispatcher routing miss
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Store or transient-channel access failure
    #[error(transparent)]
    Store(#[from] state_store::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
