//! Cache Store Module
//!
//! Keyed storage behind a single reader/writer lock. Reads hide expired
//! entries without touching the map; only the sweep frees slots.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Map of key to entry with a fixed TTL applied on every write.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    /// Lifetime given to every added entry
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Lifetime applied by [`add`](Self::add).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Add ==
    /// Inserts or overwrites `key`, resetting its expiry to now + ttl.
    ///
    /// The clock is read after the write lock is held, so time spent waiting
    /// on the lock does not eat into the entry's lifetime.
    pub fn add(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        entries.insert(key, CacheEntry::new(value, self.ttl));
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// An expired entry is reported as a miss but left in place for the sweeper.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Whether `get` would currently hit.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remaining lifetime of a live entry.
    pub fn time_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::time_remaining)
    }

    // == Expire ==
    /// Forces `key` to read as a miss from now on. No-op if absent.
    ///
    /// Takes the write lock: the timestamp lives inside the map, so mutating
    /// it needs exclusive access.
    pub fn expire<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(entry) = self.entries.write().get_mut(key) {
            entry.expire_now();
        }
    }

    // == Sweep Expired ==
    /// Removes every entry expired as of the start of the pass.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Number of map slots, counting expired entries not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if no slots are occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert_entry(&self, key: K, entry: CacheEntry<V>) {
        self.entries.write().insert(key, entry);
    }

    #[cfg(test)]
    pub(crate) fn is_stored<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> CacheStore<String, String> {
        CacheStore::new(Duration::from_secs(300))
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_add_and_get() {
        let store = store();

        store.add("key1".to_string(), "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert!(store.contains_key("key1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = store();
        assert_eq!(store.get("nonexistent"), None);
        assert!(!store.contains_key("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let store = store();

        store.add("key1".to_string(), "value1".to_string());
        store.add("key1".to_string(), "value2".to_string());

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_expired_leaves_entry() {
        let store = store();
        store.insert_entry(
            "key1".to_string(),
            CacheEntry {
                value: "value1".to_string(),
                expires_at: Instant::now(),
            },
        );

        assert_eq!(store.get("key1"), None);
        assert!(store.is_stored("key1"), "lazy expiry must not remove the slot");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_expire() {
        let store = store();
        store.add("key1".to_string(), "value1".to_string());

        store.expire("key1");

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.time_remaining("key1"), None);
        assert!(store.is_stored("key1"));
    }

    #[test]
    fn test_store_expire_nonexistent() {
        let store = store();
        store.expire("missing");
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_add_after_expire_revives() {
        let store = store();
        store.add("key1".to_string(), "value1".to_string());
        store.expire("key1");
        store.add("key1".to_string(), "value2".to_string());

        assert_eq!(store.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_store_sweep_expired() {
        let store = store();
        store.add("live".to_string(), "value".to_string());
        store.add("dead".to_string(), "value".to_string());
        store.expire("dead");

        let removed = store.sweep_expired();

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(!store.is_stored("dead"));
        assert_eq!(store.get("live"), Some("value".to_string()));
    }

    #[test]
    fn test_store_sweep_empty() {
        let store = store();
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_store_add_with_max_ttl() {
        let store: CacheStore<&str, u32> = CacheStore::new(Duration::MAX);
        store.add("k", 1);

        assert_eq!(store.get("k"), Some(1));
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_store_ttl_starts_after_lock_wait() {
        let store: Arc<CacheStore<&str, u32>> =
            Arc::new(CacheStore::new(Duration::from_secs(1)));
        let guard = store.entries.write();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.add("k", 1))
        };
        std::thread::sleep(Duration::from_millis(200));
        drop(guard);
        writer.join().unwrap();

        let remaining = store.time_remaining("k").unwrap();
        assert!(
            remaining > Duration::from_millis(900),
            "lock wait was charged to the ttl: {:?} left",
            remaining
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let store: CacheStore<&str, u32> = CacheStore::new(Duration::from_millis(50));
        store.add("a", 1);

        assert_eq!(store.get("a"), Some(1));
        let remaining = store.time_remaining("a").unwrap();
        assert_eq!(remaining, Duration::from_millis(50));

        tokio::time::advance(Duration::from_millis(50)).await;

        assert_eq!(store.get("a"), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.sweep_expired(), 1);
        assert!(store.is_empty());
    }
}
