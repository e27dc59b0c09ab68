//! Expiring Cache - A generic in-memory TTL cache
//!
//! Every entry expires a fixed time after its last write. Expired entries are
//! hidden on read and removed by a background sweeper tied to the cache's lifetime.

pub mod cache;
pub mod config;
pub mod error;
pub(crate) mod tasks;

pub use cache::ExpiringCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
