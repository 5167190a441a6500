//! Per-invocation transient parameters
//!
//! Transient data is supplied by the caller out-of-band and is never
//! written to the replicated transaction record. It is the only
//! channel through which confidential transfer details may travel.

use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;

/// Read-only bag of caller-supplied key/value parameters.
///
/// The dispatcher populates the map once per invocation; the core
/// only ever reads from it.
#[derive(Debug, Default, Clone)]
pub struct TransientMap {
    entries: HashMap<String, Bytes>,
}

impl TransientMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Used by the dispatcher when decoding an
    /// invocation; the core never calls this.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Bytes>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Get a raw value by name
    pub fn get(&self, name: &str) -> Option<&Bytes> {
        self.entries.get(name)
    }

    /// Get a value by name, decoded as UTF-8.
    ///
    /// A missing key and a non-UTF-8 value are distinct errors, both
    /// naming the field.
    pub fn get_utf8(&self, name: &str) -> Result<&str> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| Error::MissingTransient(name.to_string()))?;

        std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8(name.to_string()))
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<HashMap<String, Vec<u8>>> for TransientMap {
    fn from(raw: HashMap<String, Vec<u8>>) -> Self {
        Self {
            entries: raw
                .into_iter()
                .map(|(k, v)| (k, Bytes::from(v)))
                .collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TransientMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), Bytes::copy_from_slice(v.as_bytes())))
                .collect(),
        }
    }
}
