//! TTL cache with oldest-insertion-first eviction.
//!
//! Entries expire independently, measured from their own insertion. Expired
//! entries are treated as absent by [`TtlCache::get`] and physically dropped
//! lazily, either by [`TtlCache::purge_expired`] or when an insert finds the
//! cache full.
//!
//! When an insert of a new key finds the cache full of live entries, exactly
//! one entry is evicted: the one inserted longest ago. Replacing an existing
//! key counts as a fresh insertion.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::events::{emit, EventHook};
use crate::metrics::CACHE_LOOKUPS;

/// Build the cache key for a fetch: base URL plus normalized query.
///
/// Scheme and host are case-folded; the path is kept verbatim since
/// providers embed case-sensitive credentials in it.
pub fn fetch_signature(base_url: &str, normalized_query: &str) -> String {
    let base_url = base_url.trim();
    let base = match reqwest::Url::parse(base_url) {
        Ok(url) => url.as_str().trim_end_matches('/').to_string(),
        Err(_) => base_url.trim_end_matches('/').to_string(),
    };
    format!("{}/{}", base, normalized_query.trim_start_matches('/'))
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion sequence -> key, oldest first.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V> CacheState<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// Bounded map whose entries expire after a TTL.
///
/// All operations take the internal lock, so the cache can be shared
/// through an `Arc` between concurrent requests.
pub struct TtlCache<V> {
    state: RwLock<CacheState<V>>,
    max_entries: usize,
    default_ttl: Duration,
    event_hook: Option<EventHook>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `max_entries` (minimum 1) entries.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                next_seq: 0,
            }),
            max_entries: max_entries.max(1),
            default_ttl,
            event_hook: None,
        }
    }

    /// Install a callback receiving `(event, detail)` for hits, misses,
    /// inserts and evictions.
    pub fn with_event_hook(mut self, hook: EventHook) -> Self {
        self.event_hook = Some(hook);
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a live value. Expired entries are reported as absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let state = self.state.read().await;

        match state.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!(key = key, "Cache hit");
                emit(&self.event_hook, "cache_hit", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
                debug!(key = key, "Cache entry expired");
                emit(&self.event_hook, "cache_expired", key);
                None
            }
            None => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                debug!(key = key, "Cache miss");
                emit(&self.event_hook, "cache_miss", key);
                None
            }
        }
    }

    /// Insert with the default TTL.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Insert with an explicit TTL, replacing any existing entry.
    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let now = Instant::now();
        let mut state = self.state.write().await;

        let replaced = state.remove(&key).is_some();

        if !replaced && state.entries.len() >= self.max_entries {
            let purged = state.purge_expired(now);
            if purged > 0 {
                debug!(purged = purged, "Purged expired cache entries");
            }
            if state.entries.len() >= self.max_entries {
                if let Some(evicted) = state.evict_oldest() {
                    debug!(key = %evicted, "Evicted oldest cache entry");
                    emit(&self.event_hook, "cache_evict", &evicted);
                }
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.insert(seq, key.clone());
        emit(&self.event_hook, "cache_set", &key);
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                ttl,
                seq,
            },
        );
    }

    /// Remove an entry. Returns whether it was present (expired or not).
    pub async fn remove(&self, key: &str) -> bool {
        self.state.write().await.remove(key).is_some()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.order.clear();
    }

    /// Physically drop expired entries; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.state.write().await.purge_expired(Instant::now())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::recording_hook;
    use tokio::time::advance;

    fn cache(max: usize, ttl_ms: u64) -> TtlCache<String> {
        TtlCache::new(max, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn test_fetch_signature_normalizes() {
        assert_eq!(
            fetch_signature("HTTPS://Torrentio.Example/ ", "movie/tt1"),
            "https://torrentio.example/movie/tt1"
        );
        assert_eq!(
            fetch_signature("http://a", "/series/tt2:1:1"),
            "http://a/series/tt2:1:1"
        );
    }

    #[test]
    fn test_fetch_signature_keeps_path_case() {
        assert_eq!(
            fetch_signature("https://Debrid.Example/AbC=xYz/", "movie/tt1"),
            "https://debrid.example/AbC=xYz/movie/tt1"
        );
        assert_ne!(
            fetch_signature("https://debrid.example/TokenA", "movie/tt1"),
            fetch_signature("https://debrid.example/tokena", "movie/tt1")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get() {
        let cache = cache(10, 1_000);
        cache.set("k", "v".to_string()).await;

        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(10, 1_000);
        cache.set("k", "v".to_string()).await;

        advance(Duration::from_millis(999)).await;
        assert!(cache.get("k").await.is_some());

        advance(Duration::from_millis(1)).await;
        assert!(cache.get("k").await.is_none());
        // Expired but not yet purged
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_entry_ttl() {
        let cache = cache(10, 1_000);
        cache
            .set_with_ttl("short", "a".to_string(), Duration::from_millis(100))
            .await;
        cache.set("long", "b".to_string()).await;

        advance(Duration::from_millis(500)).await;
        assert!(cache.get("short").await.is_none());
        assert!(cache.get("long").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_evicts_exactly_oldest_insert() {
        let cache = cache(3, 60_000);
        for key in ["a", "b", "c"] {
            cache.set(key, key.to_string()).await;
            advance(Duration::from_millis(10)).await;
        }
        // Reading does not refresh insertion order
        assert!(cache.get("a").await.is_some());

        cache.set("d", "d".to_string()).await;

        assert_eq!(cache.len().await, 3);
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
        assert!(cache.get("d").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_counts_as_fresh_insert() {
        let cache = cache(2, 60_000);
        cache.set("a", "1".to_string()).await;
        cache.set("b", "2".to_string()).await;
        cache.set("a", "3".to_string()).await;

        // Replacing does not evict
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await.as_deref(), Some("3"));

        // "b" is now the oldest insertion
        cache.set("c", "4".to_string()).await;
        assert!(cache.get("b").await.is_none());
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_restarts_ttl() {
        let cache = cache(2, 1_000);
        cache.set("a", "1".to_string()).await;
        advance(Duration::from_millis(800)).await;
        cache.set("a", "2".to_string()).await;
        advance(Duration::from_millis(800)).await;

        assert_eq!(cache.get("a").await.as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_prefers_purging_expired_entries() {
        let cache = cache(2, 60_000);
        cache
            .set_with_ttl("stale", "x".to_string(), Duration::from_millis(10))
            .await;
        cache.set("live", "y".to_string()).await;
        advance(Duration::from_millis(20)).await;

        cache.set("new", "z".to_string()).await;

        assert!(cache.get("live").await.is_some());
        assert!(cache.get("new").await.is_some());
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_and_clear() {
        let cache = cache(5, 60_000);
        cache.set("a", "1".to_string()).await;
        cache.set("b", "2".to_string()).await;

        assert!(cache.remove("a").await);
        assert!(!cache.remove("a").await);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_capacity_is_clamped_to_one() {
        let cache = cache(0, 60_000);
        assert_eq!(cache.max_entries(), 1);

        cache.set("a", "1".to_string()).await;
        cache.set("b", "2".to_string()).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("b").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_hook_sees_lifecycle() {
        let (hook, events) = recording_hook();
        let cache = TtlCache::new(1, Duration::from_secs(60)).with_event_hook(hook);

        cache.set("a", 1u32).await;
        cache.get("a").await;
        cache.get("zzz").await;
        cache.set("b", 2u32).await;

        let names: Vec<String> = events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect();
        assert_eq!(
            names,
            vec!["cache_set", "cache_hit", "cache_miss", "cache_evict", "cache_set"]
        );
    }
}
