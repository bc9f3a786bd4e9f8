//! Bounded, time-expiring result cache.
//!
//! [`ResultCache`] keys computed results by string with two eviction rules:
//! least-recently-used beyond capacity, and a time-to-live measured from
//! insertion. An expired entry is removed when a lookup touches it and
//! counts as a miss.
//!
//! The cache is passive: callers load on miss and insert on success, so a
//! failed load never leaves an entry behind. The lock is held only for map
//! operations, never across a load.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{CatalogError, Result};
use crate::metrics::{record_cache_eviction, record_cache_hit, record_cache_miss};

/// Default maximum number of cached entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
/// Default entry time-to-live in seconds (one day).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

const CAPACITY_ENV: &str = "STRATA_SAMPLE_CACHE_CAPACITY";
const TTL_ENV: &str = "STRATA_SAMPLE_CACHE_TTL_SECS";

/// Cache sizing and expiry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held at once.
    pub capacity: usize,
    /// Time-to-live measured from insertion. Zero disables expiry.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl CacheConfig {
    /// Reads settings from `STRATA_SAMPLE_CACHE_CAPACITY` and
    /// `STRATA_SAMPLE_CACHE_TTL_SECS`, falling back to the defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Configuration`] when a variable is set but not a
    /// valid number, or when the capacity is zero.
    pub fn from_env() -> Result<Self> {
        let capacity: usize = parse_env(CAPACITY_ENV, DEFAULT_CACHE_CAPACITY)?;
        if capacity == 0 {
            return Err(CatalogError::configuration(format!(
                "{CAPACITY_ENV} must be positive"
            )));
        }
        let ttl_secs: u64 = parse_env(TTL_ENV, DEFAULT_CACHE_TTL_SECS)?;
        Ok(Self {
            capacity,
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CatalogError::configuration(format!("{var} must be a number, got {raw:?}"))
        }),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(CatalogError::configuration(format!("{var}: {err}"))),
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        ttl.is_zero() || self.inserted_at.elapsed() < ttl
    }
}

/// Counters describing cache behaviour since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a fresh entry.
    pub hits: u64,
    /// Lookups that found nothing, or only an expired entry.
    pub misses: u64,
    /// Values stored.
    pub insertions: u64,
    /// Entries displaced by capacity pressure.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from cache, in `[0.0, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded LRU cache with a per-entry time-to-live.
pub struct ResultCache<T> {
    entries: Mutex<LruCache<String, CacheEntry<T>>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

impl<T: Clone> ResultCache<T> {
    /// Creates a cache from `config`. A zero capacity is clamped to one.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Creates a cache with the default sizing.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Looks up `key`, promoting it to most recently used.
    ///
    /// An expired entry is dropped on the spot and reported as a miss so
    /// it can never be promoted again.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(self.ttl) {
                let value = entry.value.clone();
                drop(entries);
                self.hits.fetch_add(1, Ordering::Relaxed);
                record_cache_hit();
                return Some(value);
            }
        }
        entries.pop(key);
        drop(entries);
        self.misses.fetch_add(1, Ordering::Relaxed);
        record_cache_miss();
        None
    }

    /// Stores `value` under `key`, displacing the least-recently-used
    /// entry when the cache is at capacity.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        let displaced = self.entries.lock().push(key.clone(), entry);
        self.insertions.fetch_add(1, Ordering::Relaxed);
        if let Some((displaced_key, _)) = displaced {
            // push returns the old value on a same-key overwrite; only a
            // different key means a capacity eviction.
            if displaced_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                record_cache_eviction();
            }
        }
    }

    /// Removes `key` so the next lookup recomputes. Returns whether an
    /// entry was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.lock().pop(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries currently held. Expired entries count until a
    /// lookup touches them.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of the hit/miss/eviction counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_cache(capacity: usize, ttl: Duration) -> ResultCache<String> {
        ResultCache::new(CacheConfig { capacity, ttl })
    }

    #[test]
    fn test_get_returns_inserted_value() {
        let cache = small_cache(4, Duration::from_secs(60));
        assert_eq!(cache.get("a"), None);
        cache.insert("a", "alpha".to_string());
        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_expired_entry_counts_as_miss() {
        let cache = small_cache(4, Duration::from_millis(40));
        cache.insert("a", "alpha".to_string());
        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let cache = small_cache(4, Duration::ZERO);
        cache.insert("a", "alpha".to_string());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("a"), Some("alpha".to_string()));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = small_cache(2, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        cache.insert("b", "beta".to_string());
        // Touch `a` so `b` becomes the eviction victim.
        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        cache.insert("c", "gamma".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        assert_eq!(cache.get("c"), Some("gamma".to_string()));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_is_not_an_eviction() {
        let cache = small_cache(2, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        cache.insert("a", "alpha2".to_string());
        assert_eq!(cache.get("a"), Some("alpha2".to_string()));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().insertions, 2);
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = small_cache(2, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = small_cache(4, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        cache.insert("b", "beta".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let cache = small_cache(0, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        cache.insert("b", "beta".to_string());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_rate() {
        let cache = small_cache(4, Duration::from_secs(60));
        cache.insert("a", "alpha".to_string());
        let _ = cache.get("a");
        let _ = cache.get("missing");
        let stats = cache.stats();
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_from_env() {
        // Defaults when unset.
        std::env::remove_var(CAPACITY_ENV);
        std::env::remove_var(TTL_ENV);
        let config = CacheConfig::from_env().expect("defaults");
        assert_eq!(config, CacheConfig::default());

        // Explicit values.
        std::env::set_var(CAPACITY_ENV, "50");
        std::env::set_var(TTL_ENV, "120");
        let config = CacheConfig::from_env().expect("explicit");
        assert_eq!(config.capacity, 50);
        assert_eq!(config.ttl, Duration::from_secs(120));

        // Rejections.
        std::env::set_var(CAPACITY_ENV, "0");
        assert!(CacheConfig::from_env().is_err());
        std::env::set_var(CAPACITY_ENV, "many");
        assert!(CacheConfig::from_env().is_err());

        std::env::remove_var(CAPACITY_ENV);
        std::env::remove_var(TTL_ENV);
    }
}
