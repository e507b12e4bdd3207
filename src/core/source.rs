use crate::domain::model::{CacheEntry, RawProduct};
use crate::domain::ports::{ProductFetcher, ResultCache};
use crate::utils::error::{Result, ScoutError};

/// Cache-or-fetch source of candidate products. The cache is best-effort:
/// read failures degrade to a miss and write failures are logged and
/// swallowed. Only a failed live fetch surfaces to the caller.
pub struct ProductSource<F: ProductFetcher, C: ResultCache> {
    fetcher: F,
    cache: C,
    ttl_seconds: u64,
}

impl<F: ProductFetcher, C: ResultCache> ProductSource<F, C> {
    pub fn new(fetcher: F, cache: C, ttl_seconds: u64) -> Self {
        Self {
            fetcher,
            cache,
            ttl_seconds,
        }
    }

    pub async fn fetch(&self, product_type: &str, budget: u32) -> Result<Vec<RawProduct>> {
        match self.cache.get(product_type, budget).await {
            Ok(Some(entry)) => {
                if entry.products.is_empty() {
                    tracing::debug!("Cache entry for ({}, {}) is empty", product_type, budget);
                } else if entry.is_expired(self.ttl_seconds) {
                    tracing::debug!("Cache entry for ({}, {}) has expired", product_type, budget);
                } else {
                    tracing::debug!(
                        "Cache hit for ({}, {}): {} product(s)",
                        product_type,
                        budget,
                        entry.products.len()
                    );
                    return Ok(entry.products);
                }
            }
            Ok(None) => {
                tracing::debug!("Cache miss for ({}, {})", product_type, budget);
            }
            Err(e) => {
                tracing::warn!("Cache read failed, treating as miss: {}", e);
            }
        }

        tracing::info!("Fetching live products for ({}, {})", product_type, budget);
        let products = self
            .fetcher
            .fetch(product_type, budget)
            .await
            .map_err(|e| match e {
                e @ ScoutError::SourceUnavailable { .. } => e,
                other => ScoutError::SourceUnavailable {
                    reason: other.to_string(),
                },
            })?;

        let entry = CacheEntry::new(products.clone());
        if let Err(e) = self.cache.put(product_type, budget, &entry).await {
            tracing::warn!("Cache write failed for ({}, {}): {}", product_type, budget, e);
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockFetcher {
        products: Vec<RawProduct>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn returning(products: Vec<RawProduct>) -> Self {
            Self {
                products,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                products: vec![],
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductFetcher for &MockFetcher {
        async fn fetch(&self, _product_type: &str, _budget: u32) -> Result<Vec<RawProduct>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ScoutError::SourceUnavailable {
                    reason: "connection refused".to_string(),
                });
            }
            Ok(self.products.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MockCache {
        entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MockCache {
        fn key(product_type: &str, budget: u32) -> String {
            format!("{}:{}", product_type, budget)
        }

        async fn seed(&self, product_type: &str, budget: u32, entry: CacheEntry) {
            let mut entries = self.entries.lock().await;
            entries.insert(Self::key(product_type, budget), entry);
        }
    }

    #[async_trait]
    impl ResultCache for MockCache {
        async fn get(&self, product_type: &str, budget: u32) -> Result<Option<CacheEntry>> {
            if self.fail_reads {
                return Err(ScoutError::CacheError {
                    reason: "store unreachable".to_string(),
                });
            }
            let entries = self.entries.lock().await;
            Ok(entries.get(&Self::key(product_type, budget)).cloned())
        }

        async fn put(&self, product_type: &str, budget: u32, entry: &CacheEntry) -> Result<()> {
            if self.fail_writes {
                return Err(ScoutError::CacheError {
                    reason: "store unreachable".to_string(),
                });
            }
            let mut entries = self.entries.lock().await;
            entries.insert(Self::key(product_type, budget), entry.clone());
            Ok(())
        }
    }

    fn laptop() -> RawProduct {
        RawProduct {
            name: "Acme Laptop X".to_string(),
            price: 900.0,
            features: vec!["16GB RAM".to_string()],
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_live_fetch() {
        let fetcher = MockFetcher::returning(vec![]);
        let cache = MockCache::default();
        cache.seed("laptop", 1000, CacheEntry::new(vec![laptop()])).await;

        let source = ProductSource::new(&fetcher, cache, 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_writes_cache() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache::default();

        let source = ProductSource::new(&fetcher, cache.clone(), 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
        assert_eq!(fetcher.call_count(), 1);

        let cached = cache.get("laptop", 1000).await.unwrap().unwrap();
        assert_eq!(cached.products, vec![laptop()]);
    }

    #[tokio::test]
    async fn test_second_fetch_uses_populated_cache() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache::default();

        let source = ProductSource::new(&fetcher, cache, 3600);
        let first = source.fetch("laptop", 1000).await.unwrap();
        let second = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_cached_entry_is_a_miss() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache::default();
        cache.seed("laptop", 1000, CacheEntry::new(vec![])).await;

        let source = ProductSource::new(&fetcher, cache, 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache::default();

        let mut stale = CacheEntry::new(vec![RawProduct {
            name: "Old Laptop".to_string(),
            price: 100.0,
            features: vec![],
        }]);
        stale.fetched_at = chrono::Utc::now() - chrono::Duration::seconds(7200);
        cache.seed("laptop", 1000, stale).await;

        let source = ProductSource::new(&fetcher, cache, 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_read_failure_degrades_to_miss() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache {
            fail_reads: true,
            ..MockCache::default()
        };

        let source = ProductSource::new(&fetcher, cache, 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_swallowed() {
        let fetcher = MockFetcher::returning(vec![laptop()]);
        let cache = MockCache {
            fail_writes: true,
            ..MockCache::default()
        };

        let source = ProductSource::new(&fetcher, cache, 3600);
        let products = source.fetch("laptop", 1000).await.unwrap();

        assert_eq!(products, vec![laptop()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_as_source_unavailable() {
        let fetcher = MockFetcher::failing();
        let cache = MockCache::default();

        let source = ProductSource::new(&fetcher, cache, 3600);
        let err = source.fetch("laptop", 1000).await.unwrap_err();

        assert!(matches!(err, ScoutError::SourceUnavailable { .. }));
        // No retry.
        assert_eq!(fetcher.call_count(), 1);
    }
}
