use std::time::Duration;

use crate::cache::keys::rate_keys;
use crate::cache::models::rate::CachedRate;
use crate::cache::store::CacheStore;

/// 汇率缓存操作
pub struct RateCacheOperations;

impl RateCacheOperations {
    /// 整体替换缓存中的汇率集合
    pub async fn cache_rates(
        store: &CacheStore,
        rates: &[CachedRate],
        ttl: Duration,
    ) -> Result<(), redis::RedisError> {
        store.set(rate_keys::CURRENT_RATES_KEY, &rates, ttl).await
    }

    /// 读取缓存中的汇率集合
    pub async fn get_cached_rates(
        store: &CacheStore,
    ) -> Result<Option<Vec<CachedRate>>, redis::RedisError> {
        store.get(rate_keys::CURRENT_RATES_KEY).await
    }
}
