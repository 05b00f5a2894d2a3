//! Centralized configuration for the pattern directory proxy.
//!
//! Compile-time constants live in unit structs; the runtime settings a
//! deployment may override are collected in [`DirectoryConfig`].

use crate::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Network-related constants.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const PATTERNS_API_BASE: &'static str = "https://api.wordpress.org/patterns/1.0/";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const USER_AGENT: &'static str = "patterns-proxy/0.1";
}

/// Cache-related constants.
pub struct CacheConfig;

impl CacheConfig {
    /// Prefix shared by every cache key the directory writes.
    pub const KEY_PREFIX: &'static str = "remote_block_patterns_";
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
    pub const MEMORY_CAPACITY: u64 = 1_000;
}

/// Runtime configuration for a [`PatternDirectory`](crate::PatternDirectory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DirectoryConfig {
    /// Base URL of the remote directory API.
    pub api_base: String,
    /// Locale forwarded upstream as `locale`.
    pub locale: Option<String>,
    /// Client version forwarded upstream as `wp-version`.
    pub client_version: Option<String>,
    /// Lifetime of cached listings, in seconds.
    pub cache_ttl_secs: u64,
    /// Total request timeout for the outbound fetch, in seconds.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Entry bound for the in-memory transient store.
    pub memory_cache_capacity: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base: NetworkConfig::PATTERNS_API_BASE.to_string(),
            locale: None,
            client_version: None,
            cache_ttl_secs: CacheConfig::DEFAULT_TTL.as_secs(),
            request_timeout_secs: NetworkConfig::REQUEST_TIMEOUT.as_secs(),
            user_agent: NetworkConfig::USER_AGENT.to_string(),
            memory_cache_capacity: CacheConfig::MEMORY_CAPACITY,
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| DirectoryError::Io {
            message: format!("Failed to read config file: {}", e),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| DirectoryError::Config {
            message: format!("Invalid config file {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a working directory.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base).map_err(|e| DirectoryError::Config {
            message: format!("api_base is not a valid URL: {}", e),
        })?;
        if url.host_str().is_none() {
            return Err(DirectoryError::Config {
                message: "api_base must name a host".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(DirectoryError::Config {
                message: "request_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
