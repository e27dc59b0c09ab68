//! Expiring Cache Handle
//!
//! The public cache type. Creating one starts its sweeper; closing or
//! dropping it stops the sweeper exactly once.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::cache::{CacheStore, FAR_FUTURE};
use crate::config::{CacheConfig, DEFAULT_SWEEP_INTERVAL};
use crate::error::Result;
use crate::tasks::{spawn_sweeper, SweeperHandle};

// == Expiring Cache ==
/// A key/value cache where every entry expires a fixed `ttl` after its last
/// write.
///
/// Expired entries read as misses right away and are physically removed by a
/// background sweeper running on the Tokio runtime the cache was created on.
/// The handle is not `Clone`; share it behind an `Arc`. The sweeper stops
/// when the handle is closed or dropped, whichever comes first.
///
/// # Example
/// ```
/// # #[tokio::main]
/// # async fn main() {
/// use std::time::Duration;
/// use expiring_cache::ExpiringCache;
///
/// let cache = ExpiringCache::new(Duration::from_secs(60), Duration::from_secs(5));
/// cache.add("answer", 42);
/// assert_eq!(cache.get("answer"), Some(42));
///
/// cache.expire("answer");
/// assert_eq!(cache.get("answer"), None);
/// # }
/// ```
#[derive(Debug)]
pub struct ExpiringCache<K, V> {
    store: Arc<CacheStore<K, V>>,
    sweeper: SweeperHandle,
    sweep_interval: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache and starts its sweeper on the current Tokio runtime.
    ///
    /// A zero `sweep_interval` is replaced by the 5 second default.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime, like `tokio::spawn`.
    /// Use [`try_new`](Self::try_new) or [`with_runtime`](Self::with_runtime)
    /// where that cannot be guaranteed.
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self::with_runtime(&Handle::current(), ttl, sweep_interval)
    }

    /// Like [`new`](Self::new), but reports a missing runtime as an error.
    pub fn try_new(ttl: Duration, sweep_interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(&runtime, ttl, sweep_interval))
    }

    /// Creates a cache whose sweeper runs on the given runtime.
    ///
    /// # Arguments
    /// * `runtime` - Tokio runtime hosting the sweeper task
    /// * `ttl` - Lifetime of every entry, measured from its last `add`;
    ///   `Duration::MAX` is capped to about 30 years
    /// * `sweep_interval` - Time between sweeps; zero selects the 5 second
    ///   default and values past about 30 years are capped
    ///
    /// # Returns
    /// A running cache. Its sweeper stops on [`close`](ExpiringCache::close),
    /// [`shutdown`](ExpiringCache::shutdown) or drop.
    pub fn with_runtime(runtime: &Handle, ttl: Duration, sweep_interval: Duration) -> Self {
        let sweep_interval = if sweep_interval.is_zero() {
            debug!(
                "Zero sweep interval, using default of {:?}",
                DEFAULT_SWEEP_INTERVAL
            );
            DEFAULT_SWEEP_INTERVAL
        } else {
            sweep_interval.min(FAR_FUTURE)
        };

        let store = Arc::new(CacheStore::new(ttl));
        let sweeper = spawn_sweeper(runtime, Arc::downgrade(&store), sweep_interval);
        info!(
            "Expiring cache created: ttl={:?}, sweep_interval={:?}",
            ttl, sweep_interval
        );

        Self {
            store,
            sweeper,
            sweep_interval,
        }
    }

    /// Creates a cache from loaded configuration on the current runtime.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::try_new(config.ttl(), config.sweep_interval())
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
{
    // == Add ==
    /// Inserts or overwrites `key`; its expiry becomes now + ttl.
    pub fn add(&self, key: K, value: V) {
        self.store.add(key, value);
    }

    // == Get ==
    /// Returns the value for `key`, or `None` if absent or expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.get(key)
    }

    /// Returns true if `get` would hit.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains_key(key)
    }

    /// Remaining lifetime of a live entry.
    pub fn time_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.time_remaining(key)
    }

    // == Expire ==
    /// Makes `key` read as a miss immediately. No-op if absent.
    ///
    /// The slot is freed by the next sweep.
    pub fn expire<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.expire(key);
    }

    /// Number of stored entries, including expired ones awaiting a sweep.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Lifetime applied to each added entry.
    pub fn ttl(&self) -> Duration {
        self.store.ttl()
    }

    /// Effective sweep interval, after zero was replaced by the default.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

impl<K, V> ExpiringCache<K, V> {
    // == Close ==
    /// Stops the sweeper without waiting for it.
    ///
    /// Safe to call any number of times; returns `true` only on the call that
    /// sent the stop. Reads and writes keep working afterwards, but nothing
    /// sweeps expired entries anymore.
    ///
    /// # Returns
    /// - `true` if this call sent the stop signal
    /// - `false` if the cache was already closed
    pub fn close(&self) -> bool {
        let stopped = self.sweeper.stop();
        if stopped {
            debug!("Expiring cache closed");
        }
        stopped
    }

    /// Stops the sweeper and waits until its task has exited.
    pub async fn shutdown(self) {
        self.sweeper.join().await;
    }

    /// Returns true once a stop has been requested.
    pub fn is_closed(&self) -> bool {
        self.sweeper.is_stopped()
    }

    /// Returns true once the sweeper task has exited.
    pub fn sweeper_finished(&self) -> bool {
        self.sweeper.is_finished()
    }
}
