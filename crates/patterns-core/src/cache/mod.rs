//! Caching for pattern listings.
//!
//! The directory talks to an abstract [`TransientStore`]; two backends ship
//! with the crate:
//! - [`MemoryTransientStore`] - bounded, process-local
//! - [`SqliteTransientStore`] - persistent across restarts
//!
//! Keys come from [`CacheKey::derive`], values are encoded [`CachedPatterns`].

mod key;
mod memory;
mod sqlite;
mod traits;

pub use key::CacheKey;
pub use memory::MemoryTransientStore;
pub use sqlite::SqliteTransientStore;
pub use traits::{CachedPatterns, TransientStore};
