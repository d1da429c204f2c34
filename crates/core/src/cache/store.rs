//! Query cache storage
//!
//! Entries are type-erased so one cache can hold every resource. A value is
//! served while it is fresh; stale or missing entries are refetched.

use chrono::{DateTime, Duration, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::key::QueryKey;
use crate::Result;

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stale: bool,
    fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn fresh_value<T: Clone + 'static>(&self, max_age: Option<Duration>) -> Option<T> {
        if self.stale {
            return None;
        }
        if let Some(max_age) = max_age {
            if Utc::now() - self.fetched_at > max_age {
                return None;
            }
        }
        (*self.value).downcast_ref::<T>().cloned()
    }
}

/// Shared map from query key to last-known value
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if fresh, otherwise run `fetcher` and store its result
    ///
    /// A failed fetch leaves any existing entry as it was.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.fetch_inner(key, None, fetcher).await
    }

    /// Like [`fetch`](Self::fetch), but also refetches entries older than `max_age`
    pub async fn fetch_with_max_age<T, F, Fut>(
        &self,
        key: &QueryKey,
        max_age: Duration,
        fetcher: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.fetch_inner(key, Some(max_age), fetcher).await
    }

    /// Read that depends on a parameter; inert while the parameter is absent
    pub async fn fetch_when<P, T, K, F, Fut>(
        &self,
        param: Option<P>,
        key: K,
        fetcher: F,
    ) -> Result<Option<T>>
    where
        T: Clone + Send + Sync + 'static,
        K: FnOnce(&P) -> QueryKey,
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(param) = param else {
            return Ok(None);
        };
        let key = key(&param);
        self.fetch(&key, || fetcher(param)).await.map(Some)
    }

    async fn fetch_inner<T, F, Fut>(
        &self,
        key: &QueryKey,
        max_age: Option<Duration>,
        fetcher: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(value) = entries.get(key).and_then(|e| e.fresh_value::<T>(max_age)) {
                debug!("Cache hit for {}", key);
                return Ok(value);
            }
        }

        debug!("Fetching {}", key);
        let value = fetcher().await?;
        self.set(key.clone(), value.clone()).await;
        Ok(value)
    }

    /// Last-known value for `key`, stale or not
    pub async fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .and_then(|e| (*e.value).downcast_ref::<T>().cloned())
    }

    /// Store a fresh value; the last write wins
    pub async fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.entries.write().await.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                stale: false,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Mark every entry under `prefix` stale; returns how many were marked
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        debug!("Invalidated {} entries under {}", count, prefix);
        count
    }

    /// `Some(stale)` for a cached key, `None` if never fetched
    pub async fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.entries.read().await.get(key).map(|e| e.stale)
    }

    /// Drop everything
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counted_fetch(
        cache: &QueryCache,
        key: &QueryKey,
        calls: &AtomicUsize,
        value: u32,
    ) -> Result<u32> {
        cache
            .fetch(key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .await
    }

    #[tokio::test]
    async fn test_fresh_entry_is_reused() {
        let cache = QueryCache::new();
        let key = QueryKey::new("companies");
        let calls = AtomicUsize::new(0);

        assert_eq!(counted_fetch(&cache, &key, &calls, 1).await.unwrap(), 1);
        assert_eq!(counted_fetch(&cache, &key, &calls, 2).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_forces_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let a = QueryKey::new("schedules").id(1);
        let b = QueryKey::new("schedules").id(2);
        let users = QueryKey::new("users").id(1);

        counted_fetch(&cache, &a, &calls, 10).await.unwrap();
        counted_fetch(&cache, &b, &calls, 20).await.unwrap();
        counted_fetch(&cache, &users, &calls, 30).await.unwrap();

        assert_eq!(cache.invalidate(&QueryKey::new("schedules")).await, 2);
        assert_eq!(cache.is_stale(&a).await, Some(true));
        assert_eq!(cache.is_stale(&users).await, Some(false));

        assert_eq!(counted_fetch(&cache, &a, &calls, 11).await.unwrap(), 11);
        assert_eq!(counted_fetch(&cache, &users, &calls, 31).await.unwrap(), 30);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache = QueryCache::new();
        let key = QueryKey::new("health");
        cache.set(key.clone(), 5u32).await;
        cache.invalidate(&key).await;

        let result: Result<u32> = cache
            .fetch(&key, || async { Err(Error::validation("down")) })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.peek::<u32>(&key).await, Some(5));
        assert_eq!(cache.is_stale(&key).await, Some(true));
    }

    #[tokio::test]
    async fn test_fetch_when_is_inert_without_param() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let result: Option<u32> = cache
            .fetch_when(
                None::<i64>,
                |id| QueryKey::new("users").id(*id),
                |_| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1u32)
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let result = cache
            .fetch_when(
                Some(4i64),
                |id| QueryKey::new("users").id(*id),
                |id| async move { Ok(id as u32) },
            )
            .await
            .unwrap();
        assert_eq!(result, Some(4));
        assert_eq!(cache.peek::<u32>(&QueryKey::new("users").id(4)).await, Some(4));
    }

    #[tokio::test]
    async fn test_max_age_expires_entry() {
        let cache = QueryCache::new();
        let key = QueryKey::new("health");
        cache.set(key.clone(), 1u32).await;

        let kept = cache
            .fetch_with_max_age(&key, Duration::seconds(30), || async { Ok(2u32) })
            .await
            .unwrap();
        assert_eq!(kept, 1);

        let refreshed = cache
            .fetch_with_max_age(&key, Duration::zero() - Duration::seconds(1), || async {
                Ok(3u32)
            })
            .await
            .unwrap();
        assert_eq!(refreshed, 3);
    }

    #[tokio::test]
    async fn test_type_mismatch_refetches() {
        let cache = QueryCache::new();
        let key = QueryKey::new("companies");
        cache.set(key.clone(), "text".to_string()).await;

        let value = cache.fetch(&key, || async { Ok(7u32) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
