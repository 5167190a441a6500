//! Error types for the state tier

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// State tier errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Required transient field missing
    #[error("Missing transient field: {0}")]
    MissingTransient(String),

    /// Transient field is not valid UTF-8
    #[error("Transient field is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Key or collection name is not usable
    #[error("Invalid state key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
