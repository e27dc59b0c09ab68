//! Error types for the cache
//!
//! Cache operations themselves never fail; these errors only surface while
//! building a cache or loading its configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No Tokio runtime is available to host the sweeper task
    #[error("No Tokio runtime available for the sweeper: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
