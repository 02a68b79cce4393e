use crate::models::Property;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError<E: std::error::Error + Send + Sync + 'static> {
    #[error("Loader failed: {0}")]
    Loader(Arc<E>),
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the shared available-property pool
    pub fn available_pool() -> String {
        "properties:available".to_string()
    }
}

/// In-process cache for the available-property pool
///
/// Every search reads the full pool, so it is fetched once per TTL window
/// and shared across requests. Concurrent misses are coalesced into a
/// single backend load.
pub struct PoolCache {
    pools: moka::future::Cache<String, Arc<Vec<Property>>>,
    ttl_secs: u64,
}

/// Statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

impl PoolCache {
    /// Create a new pool cache
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let pools = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { pools, ttl_secs }
    }

    /// Get the available pool, loading it with `loader` on a miss
    pub async fn get_or_load<F, Fut, E>(&self, loader: F) -> Result<Arc<Vec<Property>>, CacheError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Property>, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let key = CacheKey::available_pool();

        if let Some(pool) = self.pools.get(&key).await {
            tracing::trace!("Pool cache hit: {}", key);
            return Ok(pool);
        }

        tracing::trace!("Pool cache miss: {}", key);
        self.pools
            .try_get_with(key, async move { loader().await.map(Arc::new) })
            .await
            .map_err(CacheError::Loader)
    }

    /// Drop the cached pool so the next search refetches it
    pub async fn invalidate(&self) {
        self.pools.invalidate(&CacheKey::available_pool()).await;
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        // entry_count lags until pending inserts and evictions are applied
        self.pools.run_pending_tasks().await;
        CacheStats {
            entries: self.pools.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FurnishedStatus, GeoPoint, TenantType, WaterFacility};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Debug, Error)]
    #[error("backend down")]
    struct LoadError;

    fn create_property(id: u128) -> Property {
        Property {
            id: Uuid::from_u128(id),
            owner_id: Uuid::from_u128(id + 1),
            title: "Cached listing".to_string(),
            location: GeoPoint::new(27.7, 85.3),
            rent_amount: 12000.0,
            rooms: 1,
            bathrooms: 1,
            furnished: FurnishedStatus::Furnished,
            water: WaterFacility::Limited,
            wifi: false,
            parking: false,
            preferred_tenant: TenantType::Any,
            is_available: true,
            image_paths: vec![],
            created_at: None,
        }
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(CacheKey::available_pool(), "properties:available");
    }

    #[tokio::test]
    async fn test_loads_once_until_invalidated() {
        let cache = PoolCache::new(4, 60);
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let pool = cache
                .get_or_load(|| async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, LoadError>(vec![create_property(1)])
                })
                .await
                .unwrap();
            assert_eq!(pool.len(), 1);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        cache
            .get_or_load(|| async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok::<_, LoadError>(vec![])
            })
            .await
            .unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loader_error_not_cached() {
        let cache = PoolCache::new(4, 60);

        let failed = cache
            .get_or_load(|| async { Err::<Vec<Property>, _>(LoadError) })
            .await;
        assert!(failed.is_err());

        let pool = cache
            .get_or_load(|| async { Ok::<_, LoadError>(vec![create_property(2)]) })
            .await
            .unwrap();
        assert_eq!(pool[0].id, Uuid::from_u128(2));
    }

    #[tokio::test]
    async fn test_stats_track_pool() {
        let cache = PoolCache::new(4, 45);
        assert_eq!(cache.stats().await.entries, 0);

        cache
            .get_or_load(|| async { Ok::<_, LoadError>(vec![create_property(3)]) })
            .await
            .unwrap();
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.ttl_secs, 45);

        cache.invalidate().await;
        assert_eq!(cache.stats().await.entries, 0);
    }
}
