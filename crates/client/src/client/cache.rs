//! Fingerprint-keyed result cache.
//!
//! Responsibilities: map a normalized request fingerprint to a previously fetched
//! result, expire entries per TTL, and collapse concurrent producers for one key.
//!
//! # What this module does NOT handle:
//! - Persistent disk caching (in-memory only)
//! - Cross-process cache sharing
//! - Deciding what is cacheable (the producer returns the TTL alongside the value)
//!
//! # Invariants
//! - A fingerprint is a pure function of the request: object keys are sorted
//!   recursively before hashing, so field order never matters
//! - TTL is enforced per entry; an entry whose age reaches its TTL is never served
//! - A zero TTL means "return to the caller but never store"
//! - At most one producer runs per key at a time; concurrent callers share its outcome

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::error::Result;
use crate::metrics::MetricsCollector;

/// Compute the cache key for a request.
///
/// The request is serialized to JSON, object keys are sorted, and the result is
/// hashed with SHA-256 under `namespace` so different request kinds never collide.
pub fn fingerprint<T: Serialize>(namespace: &str, request: &T) -> Result<String> {
    let normalized = canonicalize(serde_json::to_value(request)?);

    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"\0");
    hasher.update(serde_json::to_vec(&normalized)?);

    Ok(format!("{namespace}:{}", hex::encode(hasher.finalize())))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// A producer outcome that moka must not store.
enum Unstored<V, E> {
    /// Produced with a zero TTL.
    Value(V),
    Failed(Arc<E>),
}

/// A cached value with its expiry.
#[derive(Clone, Debug)]
pub struct CachedResult<V> {
    pub value: V,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl<V> CachedResult<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired relative to a given reference time.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.cached_at) >= self.ttl
    }
}

/// In-memory result cache.
///
/// Cloning is cheap and clones share storage.
#[derive(Clone)]
pub struct ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: MokaCache<String, CachedResult<V>>,
    name: &'static str,
    enabled: bool,
    metrics: Option<MetricsCollector>,
}

impl<V> fmt::Debug for ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `capacity` results. `name` labels metrics and logs.
    pub fn with_capacity(name: &'static str, capacity: u64) -> Self {
        Self {
            inner: MokaCache::builder().max_capacity(capacity).build(),
            name,
            enabled: true,
            metrics: None,
        }
    }

    /// Create a disabled cache: every lookup misses and nothing is stored.
    pub fn disabled(name: &'static str) -> Self {
        Self {
            inner: MokaCache::builder().max_capacity(1).build(),
            name,
            enabled: false,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get a live value.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now()).await
    }

    /// Get a live value, checking expiration relative to a given time.
    pub async fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        if !self.enabled {
            return None;
        }

        match self.inner.get(key).await {
            Some(entry) if !entry.is_expired_at(now) => {
                trace!(cache = self.name, key, "Cache hit");
                self.record_hit();
                Some(entry.value)
            }
            Some(_) => {
                trace!(cache = self.name, key, "Cache entry expired");
                self.inner.invalidate(key).await;
                self.record_miss();
                None
            }
            None => {
                trace!(cache = self.name, key, "Cache miss");
                self.record_miss();
                None
            }
        }
    }

    /// Store a value. A zero TTL stores nothing.
    pub async fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        if !self.enabled || ttl.is_zero() {
            return;
        }
        self.inner
            .insert(key.into(), CachedResult::new(value, ttl))
            .await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        debug!(cache = self.name, "Invalidated all cache entries");
    }

    /// Return the live value for `key`, or run `producer` and cache what it returns.
    ///
    /// The producer yields the value and the TTL to keep it for. Concurrent calls
    /// for the same key wait for a single producer run and share its result or
    /// error; the error is shared through an `Arc`. A zero-TTL value is handed to
    /// every waiter but never enters the cache.
    pub async fn get_or_try_insert_with<E, Fut>(
        &self,
        key: &str,
        producer: Fut,
    ) -> std::result::Result<V, Arc<E>>
    where
        Fut: Future<Output = std::result::Result<(V, Duration), E>>,
        E: Send + Sync + 'static,
    {
        if !self.enabled {
            return producer.await.map(|(value, _)| value).map_err(Arc::new);
        }

        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let produced = self
            .inner
            .try_get_with(key.to_string(), async move {
                match producer.await {
                    Ok((value, ttl)) if ttl.is_zero() => Err(Unstored::Value(value)),
                    Ok((value, ttl)) => Ok(CachedResult::new(value, ttl)),
                    Err(e) => Err(Unstored::Failed(Arc::new(e))),
                }
            })
            .await;

        match produced {
            Ok(entry) => Ok(entry.value),
            Err(unstored) => match unstored.as_ref() {
                Unstored::Value(value) => {
                    trace!(cache = self.name, key, "Result not cacheable, not stored");
                    Ok(value.clone())
                }
                Unstored::Failed(e) => Err(Arc::clone(e)),
            },
        }
    }

    fn record_hit(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_hit(self.name);
        }
    }

    fn record_miss(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_miss(self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = json!({"query": "foo", "from": "x", "to": "y", "timeZone": "UTC"});
        let b = json!({"timeZone": "UTC", "to": "y", "from": "x", "query": "foo"});
        assert_eq!(
            fingerprint("search", &a).unwrap(),
            fingerprint("search", &b).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_namespaced() {
        let body = json!({"query": "foo"});
        assert_ne!(
            fingerprint("search", &body).unwrap(),
            fingerprint("metrics", &body).unwrap()
        );
        assert!(fingerprint("search", &body).unwrap().starts_with("search:"));
    }

    #[test]
    fn test_entry_expiry_boundary() {
        let entry = CachedResult::new(1, Duration::from_secs(60));
        assert!(!entry.is_expired_at(entry.cached_at + Duration::from_secs(59)));
        assert!(entry.is_expired_at(entry.cached_at + Duration::from_secs(60)));

        let uncacheable = CachedResult::new(1, Duration::ZERO);
        assert!(uncacheable.is_expired_at(uncacheable.cached_at));
    }

    #[tokio::test]
    async fn test_get_at_respects_ttl() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);
        cache.insert("k", 7, Duration::from_secs(3600)).await;

        assert_eq!(cache.get("k").await, Some(7));
        let later = Instant::now() + Duration::from_secs(3601);
        assert_eq!(cache.get_at("k", later).await, None);
        // Expired lookups evict.
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_producer_not_called_on_hit() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("k", async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>((42, Duration::from_secs(60)))
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_result_returned_but_not_kept() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);

        let value = cache
            .get_or_try_insert_with("k", async { Ok::<_, String>((1, Duration::ZERO)) })
            .await
            .unwrap();
        assert_eq!(value, 1);
        assert_eq!(cache.get("k").await, None);

        let value = cache
            .get_or_try_insert_with("k", async { Ok::<_, String>((2, Duration::ZERO)) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn test_uncacheable_result_shared_with_waiters_but_never_stored() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);
        let calls = Arc::new(AtomicUsize::new(0));

        let run = |cache: ResultCache<u32>, calls: Arc<AtomicUsize>| async move {
            cache
                .get_or_try_insert_with("k", async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, String>((3, Duration::ZERO))
                })
                .await
        };

        let (a, b) = tokio::join!(
            run(cache.clone(), Arc::clone(&calls)),
            run(cache.clone(), Arc::clone(&calls))
        );
        assert_eq!(a.unwrap(), 3);
        assert_eq!(b.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Nothing was ever written, so moka has no entry to hand out.
        assert!(!cache.inner.contains_key("k"));
        cache.inner.run_pending_tasks().await;
        assert_eq!(cache.inner.entry_count(), 0);

        run(cache.clone(), Arc::clone(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);

        let err = cache
            .get_or_try_insert_with("k", async { Err::<(u32, Duration), _>("down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err.as_str(), "down");

        let value = cache
            .get_or_try_insert_with("k", async { Ok::<_, String>((5, Duration::from_secs(60))) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_producer() {
        let cache: ResultCache<u32> = ResultCache::with_capacity("test", 10);
        let calls = Arc::new(AtomicUsize::new(0));

        let run = |cache: ResultCache<u32>, calls: Arc<AtomicUsize>| async move {
            cache
                .get_or_try_insert_with("k", async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, String>((9, Duration::from_secs(60)))
                })
                .await
        };

        let (a, b) = tokio::join!(
            run(cache.clone(), Arc::clone(&calls)),
            run(cache.clone(), Arc::clone(&calls))
        );

        assert_eq!(a.unwrap(), 9);
        assert_eq!(b.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_produces() {
        let cache: ResultCache<u32> = ResultCache::disabled("test");
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_try_insert_with("k", async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>((1, Duration::from_secs(60)))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.is_enabled());
    }
}
