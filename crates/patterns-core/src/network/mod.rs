//! Network access to the remote pattern directory.
//!
//! This module provides:
//! - A [`Transport`] seam for outbound GET requests, with a reqwest-backed
//!   implementation
//! - [`RemoteFetcher`], which maps a normalized query onto the directory's
//!   query string and performs the fetch

mod fetcher;
mod transport;

pub use fetcher::RemoteFetcher;
pub use transport::{HttpTransport, RawResponse, Transport};
