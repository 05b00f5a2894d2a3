//! Builder for [`PatternDirectory`].

use super::pipeline::{PatternHook, Pipeline, RequestContext};
use super::service::PatternDirectory;
use crate::cache::{MemoryTransientStore, TransientStore};
use crate::config::DirectoryConfig;
use crate::error::Result;
use crate::models::PatternRecord;
use crate::network::{HttpTransport, RemoteFetcher, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Builder for configuring a [`PatternDirectory`].
///
/// Anything left unset falls back to the default: a reqwest transport and a
/// bounded in-memory store sized from the config.
///
/// # Example
///
/// ```rust,no_run
/// use patterns_core::{DirectoryConfig, PatternDirectory, SqliteTransientStore};
/// use std::sync::Arc;
///
/// # fn main() -> patterns_core::Result<()> {
/// let directory = PatternDirectory::builder()
///     .config(DirectoryConfig::default())
///     .store(Arc::new(SqliteTransientStore::new("patterns.db")?))
///     .hook(|mut pattern, _record, _ctx| {
///         pattern["source"] = "remote".into();
///         pattern
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PatternDirectoryBuilder {
    config: DirectoryConfig,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn TransientStore>>,
    pipeline: Pipeline,
}

impl PatternDirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: DirectoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom outbound transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom transient store. Stores may be shared between directories.
    pub fn store(mut self, store: Arc<dyn TransientStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Append a closure hook. Hooks run in the order they are added.
    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value, &PatternRecord, &RequestContext) -> Value + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.hook(hook);
        self
    }

    /// Append a shared hook.
    pub fn add_hook(mut self, hook: Arc<dyn PatternHook>) -> Self {
        self.pipeline.add_hook(hook);
        self
    }

    pub fn build(self) -> Result<PatternDirectory> {
        self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        let store: Arc<dyn TransientStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryTransientStore::new(
                self.config.memory_cache_capacity,
            )),
        };

        Ok(PatternDirectory {
            fetcher: RemoteFetcher::new(transport, &self.config)?,
            store,
            pipeline: self.pipeline,
            cache_ttl: self.config.cache_ttl(),
        })
    }
}
