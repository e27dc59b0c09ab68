//! Cache Entry Module
//!
//! Defines the value wrapper stored in the map, carrying its absolute expiry.

use std::time::Duration;

use tokio::time::Instant;

/// Stand-in for "never" when a duration overflows the clock (about 30 years)
pub(crate) const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Returns `now + after`, capped at [`FAR_FUTURE`] past `now` on overflow.
pub(crate) fn deadline_after(now: Instant, after: Duration) -> Instant {
    now.checked_add(after).unwrap_or_else(|| now + FAR_FUTURE)
}

// == Cache Entry ==
/// A stored value together with the instant it stops being visible.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry on the monotonic clock
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry; durations past the clock's range are
    ///   capped so `Duration::MAX` means "effectively never"
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline_after(Instant::now(), ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same check against a caller-supplied instant, so one sweep pass can
    /// judge every entry against the same `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Expire Now ==
    /// Moves the expiry to the current instant.
    pub fn expire_now(&mut self) {
        self.expires_at = Instant::now();
    }

    // == Time To Live ==
    /// Remaining lifetime, or zero once expired.
    pub fn time_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
