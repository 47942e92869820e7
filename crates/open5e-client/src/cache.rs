//! Query cache.
//!
//! Responses are cached by [`QueryKey`] and never go stale: an entry lives
//! until it is invalidated or the process exits. Concurrent requests for the
//! same key share one fetch. Failed fetches leave nothing behind, so the next
//! request tries again.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::sources::Sources;

/// Ordered cache key: operation, endpoint or identifier, sources and extra params.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: &'static str,
    pub target: String,
    pub sources: Vec<String>,
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(
        operation: &'static str,
        target: impl Into<String>,
        sources: &Sources,
        params: &[(String, String)],
    ) -> Self {
        Self {
            operation,
            target: target.into(),
            sources: sources.as_slice().to_vec(),
            params: params.to_vec(),
        }
    }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Arc<OnceCell<Arc<Value>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, running `fetch` on a miss.
    pub async fn get_or_fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        // Clone the cell out so no map guard is held across the await.
        let cell = Arc::clone(&self.entries.entry(key.clone()).or_default());

        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(operation = key.operation, target = %key.target, "cache hit");
            return Ok(Arc::clone(value));
        }

        let misses = &self.misses;
        let key = &key;
        let result = cell
            .get_or_try_init(move || async move {
                misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(operation = key.operation, target = %key.target, "cache miss");
                fetch().await.map(Arc::new)
            })
            .await;
        match result {
            Ok(value) => Ok(Arc::clone(value)),
            Err(e) => {
                // Drop the empty cell so failing keys do not accumulate.
                self.entries.remove_if(key, |_, cell| !cell.initialized());
                Err(e)
            }
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<Arc<Value>> {
        self.entries
            .get(key)
            .and_then(|cell| cell.get().map(Arc::clone))
    }

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of keys holding a value.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn key(target: &str) -> QueryKey {
        QueryKey::new("findMany", target, &Sources::from(vec!["wotc-srd"]), &[])
    }

    #[tokio::test]
    async fn test_second_lookup_is_a_hit() {
        let cache = QueryCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(key("monsters"), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"results": []}))
                })
                .await
                .unwrap();
            assert_eq!(*value, json!({"results": []}));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 2,
                misses: 1
            }
        );
    }

    #[tokio::test]
    async fn test_keys_differ_by_sources() {
        let cache = QueryCache::new();
        let a = QueryKey::new("findMany", "spells", &Sources::from(vec!["wotc-srd"]), &[]);
        let b = QueryKey::new("findMany", "spells", &Sources::from(vec!["tob"]), &[]);
        assert_ne!(a, b);

        cache.get_or_fetch(a.clone(), || async { Ok(json!(1)) }).await.unwrap();
        cache.get_or_fetch(b.clone(), || async { Ok(json!(2)) }).await.unwrap();
        assert_eq!(cache.get(&a).as_deref(), Some(&json!(1)));
        assert_eq!(cache.get(&b).as_deref(), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = QueryCache::new();

        let err = cache
            .get_or_fetch(key("classes"), || async {
                Err(ClientError::Status {
                    status: 503,
                    body: String::new(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 503, .. }));
        assert!(cache.is_empty());

        let value = cache
            .get_or_fetch(key("classes"), || async { Ok(json!({"results": [1]})) })
            .await
            .unwrap();
        assert_eq!(value["results"][0], 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_keys_leave_no_entry() {
        let cache = QueryCache::new();
        for target in ["missing-a", "missing-b", "missing-c"] {
            let result = cache
                .get_or_fetch(key(target), || async {
                    Err(ClientError::not_found("monster", "nope"))
                })
                .await;
            assert!(result.is_err());
        }
        assert_eq!(cache.entries.len(), 0);
        assert_eq!(cache.stats().misses, 3);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = QueryCache::new();
        cache.get_or_fetch(key("a"), || async { Ok(json!(1)) }).await.unwrap();
        cache.get_or_fetch(key("b"), || async { Ok(json!(2)) }).await.unwrap();

        assert!(cache.invalidate(&key("a")));
        assert!(!cache.invalidate(&key("a")));
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let cache = QueryCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(json!("shared"))
        };
        let (a, b) = tokio::join!(
            cache.get_or_fetch(key("documents"), fetch),
            cache.get_or_fetch(key("documents"), fetch)
        );

        assert_eq!(*a.unwrap(), json!("shared"));
        assert_eq!(*b.unwrap(), json!("shared"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
