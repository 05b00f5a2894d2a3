//! Patterns Core - caching client for a remote block pattern directory.
//!
//! This crate answers pattern listing queries by validating the query,
//! looking it up in a transient store, fetching from the remote directory on a
//! miss, and projecting each record through an ordered hook pipeline. It can be
//! used without the HTTP layer in `patterns-server`.
//!
//! # Example
//!
//! ```rust,no_run
//! use patterns_core::{DirectoryRequest, PatternDirectory};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> patterns_core::Result<()> {
//!     let directory = PatternDirectory::builder().build()?;
//!
//!     let params = json!({ "category": 2, "per_page": 10 });
//!     let params = params.as_object().cloned().unwrap_or_default();
//!     let response = directory.get_items(&DirectoryRequest::get(params)).await?;
//!
//!     println!("{} patterns ({})", response.items.len(), response.cache_status.as_str());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod network;
pub mod query;

// Re-export commonly used types
pub use cache::{
    CacheKey, CachedPatterns, MemoryTransientStore, SqliteTransientStore, TransientStore,
};
pub use config::DirectoryConfig;
pub use directory::{
    CacheStatus, DirectoryRequest, DirectoryResponse, PatternDirectory, PatternDirectoryBuilder,
    PatternHook, Pipeline, RequestContext, RequestMethod,
};
pub use error::{DirectoryError, ErrorPayload, Result};
pub use models::{prepare_pattern, PatternRecord, PATTERN_FIELDS};
pub use network::{HttpTransport, RawResponse, RemoteFetcher, Transport};
pub use query::{validate, NormalizedQuery, QueryParams, RawParams};
