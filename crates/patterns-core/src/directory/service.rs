//! The caching pattern directory.

use super::builder::PatternDirectoryBuilder;
use super::parser::parse_response;
use super::pipeline::{Pipeline, RequestContext};
use super::request::{CacheStatus, DirectoryRequest, DirectoryResponse, RequestMethod};
use crate::cache::{CacheKey, CachedPatterns, TransientStore};
use crate::error::Result;
use crate::models::PatternRecord;
use crate::network::RemoteFetcher;
use crate::query::{validate, NormalizedQuery};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Serves pattern listings from the transient store, fetching from the remote
/// directory on a miss.
///
/// Each request is independent. The store is the only shared state, and no
/// lock is held while a fetch is in flight, so concurrent misses for the same
/// key may each fetch and the last write wins.
pub struct PatternDirectory {
    pub(super) fetcher: RemoteFetcher,
    pub(super) store: Arc<dyn TransientStore>,
    pub(super) pipeline: Pipeline,
    pub(super) cache_ttl: Duration,
}

impl fmt::Debug for PatternDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDirectory")
            .field("fetcher", &self.fetcher)
            .field("pipeline", &self.pipeline)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl PatternDirectory {
    pub fn builder() -> PatternDirectoryBuilder {
        PatternDirectoryBuilder::new()
    }

    /// Validate an inbound request and answer it.
    pub async fn get_items(&self, request: &DirectoryRequest) -> Result<DirectoryResponse> {
        let query = validate(&request.params).inspect_err(|err| {
            debug!("Rejected {} request: {}", request.method, err);
        })?;
        self.list(request.method, query).await
    }

    /// Answer an already validated query.
    pub async fn list(
        &self,
        method: RequestMethod,
        query: NormalizedQuery,
    ) -> Result<DirectoryResponse> {
        let key = self.cache_key(&query);

        let (records, cache_status) = match self.read_cache(&key) {
            Some(records) => (records, CacheStatus::Hit),
            None => (self.fetch_and_store(&key, &query).await?, CacheStatus::Miss),
        };

        if method.is_metadata_only() {
            return Ok(DirectoryResponse {
                status: 200,
                items: Vec::new(),
                cache_status,
            });
        }

        let ctx = RequestContext::new(method, query);
        let items = self.pipeline.apply(&records, &ctx);

        Ok(DirectoryResponse {
            status: 200,
            items,
            cache_status,
        })
    }

    /// Key the listing for `query` is stored under.
    pub fn cache_key(&self, query: &NormalizedQuery) -> CacheKey {
        CacheKey::derive(&self.fetcher.outbound_params(query))
    }

    /// Drop the cached listing for `query`, if any.
    pub fn invalidate(&self, query: &NormalizedQuery) -> Result<bool> {
        self.store.delete(self.cache_key(query).as_str())
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Cached records for `key`. Backend failures and undecodable entries
    /// count as a miss.
    fn read_cache(&self, key: &CacheKey) -> Option<Vec<PatternRecord>> {
        let bytes = match self.store.get(key.as_str()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}, fetching instead: {}", key, e);
                return None;
            }
        };

        match CachedPatterns::decode(&bytes) {
            Ok(cached) => {
                debug!(
                    "Cache hit for {} ({} patterns, {}s old)",
                    key,
                    cached.records.len(),
                    cached.age().num_seconds()
                );
                Some(cached.records)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn fetch_and_store(
        &self,
        key: &CacheKey,
        query: &NormalizedQuery,
    ) -> Result<Vec<PatternRecord>> {
        let response = self
            .fetcher
            .fetch(query)
            .await
            .inspect_err(|err| warn!("Pattern fetch failed: {}", err))?;

        let records = parse_response(&response)
            .inspect_err(|err| warn!("Rejected pattern directory response: {}", err))?;

        info!(
            "Fetched {} patterns from {}",
            records.len(),
            self.fetcher.host().unwrap_or("pattern directory")
        );

        let entry = CachedPatterns::new(records);
        match entry
            .encode()
            .and_then(|bytes| self.store.set(key.as_str(), &bytes, self.cache_ttl))
        {
            Ok(()) => debug!("Cached {} for {:?}", key, self.cache_ttl),
            Err(e) => warn!("Failed to cache {}: {}", key, e),
        }

        Ok(entry.records)
    }
}
