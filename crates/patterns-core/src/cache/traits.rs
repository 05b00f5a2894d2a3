//! Transient store trait and the cached listing envelope.

use crate::error::{DirectoryError, Result};
use crate::models::PatternRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Key-value store with per-entry expiry.
///
/// Single-key `get` and `set` must be atomic; the directory never performs a
/// read-modify-write against the store. All operations are synchronous to
/// match rusqlite's API.
pub trait TransientStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value, replacing any existing entry under the same key.
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Delete one entry. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every entry.
    fn clear(&self) -> Result<()>;
}

/// A validated listing as written to the transient store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPatterns {
    /// When the listing was fetched and stored.
    pub stored_at: DateTime<Utc>,
    pub records: Vec<PatternRecord>,
}

impl CachedPatterns {
    pub fn new(records: Vec<PatternRecord>) -> Self {
        Self {
            stored_at: Utc::now(),
            records,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(DirectoryError::from)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| DirectoryError::Json {
            message: format!("Failed to decode cached patterns: {}", e),
            source: Some(e),
        })
    }

    /// Age of the entry relative to now.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.stored_at)
    }
}
