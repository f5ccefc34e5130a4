//! In-memory TTL cache for upstream responses.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

use super::params::RequestKey;

/// Default freshness window (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Time source for cache freshness checks.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached payload and the instant it was fetched.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
}

/// Response cache keyed by [`RequestKey`].
///
/// An entry is fresh while `now - fetched_at < ttl`. Expired entries stay in
/// the map until the next `put` for the same key overwrites them; there is no
/// size bound and no eviction.
#[allow(clippy::module_name_repetitions)]
pub struct TtlCache {
    entries: DashMap<RequestKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TtlCache {
    /// Creates a cache with the given TTL and the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a cache with a custom time source.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Returns the payload for `key` if present and still fresh.
    #[must_use]
    pub fn get(&self, key: &RequestKey) -> Option<Value> {
        let entry = self.entries.get(key)?;
        let age = self.clock.now().saturating_duration_since(entry.fetched_at);
        if age < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Stores `payload` for `key`, replacing any previous entry.
    pub fn put(&self, key: RequestKey, payload: Value) {
        let fetched_at = self.clock.now();
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at,
            },
        );
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::tmdb::params::QueryParams;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub(crate) struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Instant::now()),
            })
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn key(page: u32) -> RequestKey {
        RequestKey::new("movie/popular", &QueryParams::new().with("page", page))
    }

    #[test]
    fn test_put_then_get_hits() {
        // Arrange
        let cache = TtlCache::new(DEFAULT_TTL);

        // Act
        cache.put(key(1), json!({"page": 1}));

        // Assert
        assert_eq!(cache.get(&key(1)), Some(json!({"page": 1})));
        assert_eq!(cache.get(&key(2)), None);
    }

    #[test]
    fn test_get_after_ttl_misses() {
        // Arrange
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(DEFAULT_TTL, clock.clone());
        cache.put(key(1), json!({"page": 1}));

        // Act
        clock.advance(DEFAULT_TTL);

        // Assert
        assert_eq!(cache.get(&key(1)), None);
    }

    #[test]
    fn test_get_just_before_ttl_hits() {
        // Arrange
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(DEFAULT_TTL, clock.clone());
        cache.put(key(1), json!({"page": 1}));

        // Act
        clock.advance(DEFAULT_TTL - Duration::from_millis(1));

        // Assert
        assert!(cache.get(&key(1)).is_some());
    }

    #[test]
    fn test_expired_entry_is_not_purged_until_overwritten() {
        // Arrange
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(DEFAULT_TTL, clock.clone());
        cache.put(key(1), json!({"v": "old"}));
        clock.advance(DEFAULT_TTL * 2);

        // Act
        let expired = cache.get(&key(1));
        let len_after_miss = cache.len();
        cache.put(key(1), json!({"v": "new"}));

        // Assert
        assert_eq!(expired, None);
        assert_eq!(len_after_miss, 1);
        assert_eq!(cache.get(&key(1)), Some(json!({"v": "new"})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_replaces_without_merging() {
        // Arrange
        let cache = TtlCache::default();
        cache.put(key(1), json!({"a": 1, "b": 2}));

        // Act
        cache.put(key(1), json!({"c": 3}));

        // Assert
        assert_eq!(cache.get(&key(1)), Some(json!({"c": 3})));
    }

    #[test]
    fn test_replacement_resets_freshness() {
        // Arrange
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());
        cache.put(key(1), json!(1));
        clock.advance(Duration::from_secs(8));

        // Act
        cache.put(key(1), json!(2));
        clock.advance(Duration::from_secs(8));

        // Assert
        assert_eq!(cache.get(&key(1)), Some(json!(2)));
    }

    #[test]
    fn test_clear_drops_everything() {
        // Arrange
        let cache = TtlCache::default();
        cache.put(key(1), json!(1));
        cache.put(key(2), json!(2));

        // Act
        cache.clear();

        // Assert
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key(1)), None);
    }

    #[test]
    fn test_instances_are_independent() {
        // Arrange
        let a = TtlCache::default();
        let b = TtlCache::default();
        a.put(key(1), json!(1));
        b.put(key(1), json!(1));

        // Act
        a.clear();

        // Assert
        assert!(a.get(&key(1)).is_none());
        assert!(b.get(&key(1)).is_some());
    }
}
