//! Cache Module
//!
//! Provides a generic in-memory cache with TTL expiration and background sweeping.

mod entry;
mod handle;
mod store;


// Re-export public types
pub use handle::ExpiringCache;

pub(crate) use entry::{deadline_after, CacheEntry, FAR_FUTURE};
pub(crate) use store::CacheStore;
