//! The caching pattern directory.
//!
//! A request moves through validation, cache key derivation, a store lookup,
//! and on a miss a fetch, parse and store. Then the records go through the
//! hook pipeline. Metadata-only requests stop before the pipeline.

mod builder;
mod parser;
mod pipeline;
mod request;
mod service;

pub use builder::PatternDirectoryBuilder;
pub use parser::{parse_patterns, parse_response};
pub use pipeline::{PatternHook, Pipeline, RequestContext};
pub use request::{CacheStatus, DirectoryRequest, DirectoryResponse, RequestMethod};
pub use service::PatternDirectory;
