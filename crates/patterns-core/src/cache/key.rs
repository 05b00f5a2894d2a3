//! Canonical cache keys for pattern listings.

use crate::config::CacheConfig;
use crate::query::{ParamValue, QueryParams};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque key under which a listing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a parameter map.
    ///
    /// Parameters are visited in name order, list values are sorted and empty
    /// lists are skipped, so the key depends only on the logical content of
    /// the map. Every name and value is tagged and length-prefixed before
    /// hashing, which keeps distinct maps from sharing a byte encoding.
    pub fn derive(params: &QueryParams) -> Self {
        let mut hasher = Sha256::new();

        for (name, value) in params.iter() {
            if let ParamValue::List(items) = value {
                if items.is_empty() {
                    continue;
                }
            }

            write_bytes(&mut hasher, name.as_bytes());
            match value {
                ParamValue::Int(v) => {
                    hasher.update(b"i");
                    hasher.update(v.to_le_bytes());
                }
                ParamValue::Text(v) => {
                    hasher.update(b"s");
                    write_bytes(&mut hasher, v.as_bytes());
                }
                ParamValue::List(items) => {
                    let mut sorted: Vec<&String> = items.iter().collect();
                    sorted.sort();
                    hasher.update(b"l");
                    hasher.update((sorted.len() as u64).to_le_bytes());
                    for item in sorted {
                        write_bytes(&mut hasher, item.as_bytes());
                    }
                }
            }
        }

        CacheKey(format!(
            "{}{}",
            CacheConfig::KEY_PREFIX,
            hex::encode(hasher.finalize())
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
