//! In-memory transient store backed by mini-moka.

use super::traits::TransientStore;
use crate::error::Result;
use mini_moka::sync::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct StoredValue {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// Bounded in-memory store. Entries expire individually.
pub struct MemoryTransientStore {
    entries: Cache<String, Arc<StoredValue>>,
}

impl MemoryTransientStore {
    /// Create a store holding at most `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Number of live entries, as last counted by the cache.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl std::fmt::Debug for MemoryTransientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransientStore")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl TransientStore for MemoryTransientStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = key.to_string();
        match self.entries.get(&key) {
            Some(stored) if stored.expires_at > Instant::now() => Ok(Some(stored.bytes.clone())),
            Some(_) => {
                self.entries.invalidate(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let stored = StoredValue {
            bytes: value.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_string(), Arc::new(stored));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        let existed = self.entries.contains_key(&key);
        self.entries.invalidate(&key);
        Ok(existed)
    }

    fn clear(&self) -> Result<()> {
        self.entries.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryTransientStore::new(10);
        store
            .set("key1", b"hello world", Duration::from_secs(3600))
            .unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(b"hello world".to_vec()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_expired_entries_are_absent() {
        let store = MemoryTransientStore::new(10);
        store.set("key1", b"old", Duration::ZERO).unwrap();
        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryTransientStore::new(10);
        store.set("key1", b"first", Duration::from_secs(60)).unwrap();
        store.set("key1", b"second", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("key1").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = MemoryTransientStore::new(10);
        store.set("key1", b"a", Duration::from_secs(60)).unwrap();
        store.set("key2", b"b", Duration::from_secs(60)).unwrap();

        assert!(store.delete("key1").unwrap());
        assert!(!store.delete("key1").unwrap());
        assert_eq!(store.get("key1").unwrap(), None);

        store.clear().unwrap();
        assert_eq!(store.get("key2").unwrap(), None);
    }
}
