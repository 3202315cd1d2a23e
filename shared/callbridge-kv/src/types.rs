//! Common Types for the key-value store

use serde::Serialize;

/// Key-value entry. Entries are written without expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
}

impl KvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build an entry holding `value` serialized as JSON
    pub fn json<T: Serialize>(key: impl Into<String>, value: &T) -> crate::Result<Self> {
        Ok(Self::new(key, serde_json::to_string(value)?))
    }
}
