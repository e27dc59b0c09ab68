//! Configuration Module
//!
//! Handles loading cache timing parameters from environment variables or JSON.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Default entry lifetime in milliseconds (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 300_000;

/// Default sweep interval in milliseconds, also substituted for a zero interval
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 5_000;

/// Default sweep interval as a `Duration`.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS);

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of every entry in milliseconds, measured from its last `add`
    pub ttl_ms: u64,
    /// Interval between background sweeps in milliseconds
    pub sweep_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry lifetime in milliseconds (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 5000)
    pub fn from_env() -> Self {
        Self {
            ttl_ms: env_u64("CACHE_TTL_MS", DEFAULT_TTL_MS),
            sweep_interval_ms: env_u64("CACHE_SWEEP_INTERVAL_MS", DEFAULT_SWEEP_INTERVAL_MS),
        }
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Entry lifetime as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
