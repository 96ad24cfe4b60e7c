use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sqlx::PgPool;

use crate::cache::keys::product_keys;
use crate::cache::models::product::CachedProduct;
use crate::cache::store::CacheStore;
use crate::config::Config;
use crate::database::repositories::product::ProductRepository;

/// 按产品ID的互斥锁表，用于缓存未命中时的防踩踏保护
///
/// 锁按需创建且不回收，上限是进程生命周期内请求过的产品数。
/// 锁的作用域仅为产品ID（不含租户ID），与既有行为保持一致：
/// 不同租户下相同的产品ID会争用同一把锁，这是已知的不精确之处。
pub struct ProductLocks {
    inner: Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// 获取产品ID对应的锁，不存在则创建
    pub fn lock_for(&self, product_id: i32) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(product_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

impl Default for ProductLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// 按分区宽度把产品ID分组到分区桶
pub fn group_into_partitions(ids: &[i32], partition_size: i32) -> HashMap<i32, Vec<i32>> {
    let mut partitions: HashMap<i32, Vec<i32>> = HashMap::new();
    for &id in ids {
        partitions
            .entry(product_keys::partition_index(id, partition_size))
            .or_default()
            .push(id);
    }
    partitions
}

/// 产品缓存操作
/// 租户感知的 cache-aside 层：命中直接返回，未命中回源填充
pub struct ProductCacheOperations;

impl ProductCacheOperations {
    /// 单个产品读取，带双重检查锁防止缓存踩踏
    ///
    /// N个并发未命中同一产品ID时，最多只发生一次回源读取。
    /// 缓存后端故障降级为直接查询数据源，不向调用方暴露。
    pub async fn get_product(
        store: &CacheStore,
        pool: &PgPool,
        locks: &ProductLocks,
        config: &Config,
        tenant_id: i32,
        product_id: i32,
    ) -> Result<Option<CachedProduct>, sqlx::Error> {
        let key = product_keys::product_key(tenant_id, product_id);

        match store.get::<CachedProduct>(&key).await {
            Ok(Some(product)) => {
                tracing::debug!("Cache hit for product {} (tenant {})", product_id, tenant_id);
                return Ok(Some(product));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to database: {}", key, e);
            }
        }

        let lock = locks.lock_for(product_id);
        let _guard = lock.lock().await;

        // 双重检查：等锁期间可能已被其他调用方填充
        if let Ok(Some(product)) = store.get::<CachedProduct>(&key).await {
            return Ok(Some(product));
        }

        let entity = ProductRepository::find_active(pool, tenant_id, product_id).await?;

        match entity {
            Some(entity) => {
                let product = CachedProduct::from_entity(&entity);
                if let Err(e) = Self::cache_product(store, config, &product).await {
                    tracing::warn!("Failed to cache product {}: {}", product_id, e);
                }
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    /// 分类产品分页读取
    ///
    /// 不加锁：首次并发访问允许少量重复的分页查询，代价有界。
    /// 非空结果会触发后台任务填充分区桶，保证后续按分区失效的准确性。
    pub async fn get_products_by_category(
        store: &CacheStore,
        pool: &PgPool,
        config: &Config,
        tenant_id: i32,
        category_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<CachedProduct>, sqlx::Error> {
        let key = product_keys::category_products_page_key(tenant_id, category_id, page, page_size);

        match store.get::<Vec<CachedProduct>>(&key).await {
            Ok(Some(products)) => return Ok(products),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to database: {}", key, e);
            }
        }

        let entities =
            ProductRepository::list_by_category(pool, tenant_id, category_id, page, page_size)
                .await?;
        let products: Vec<CachedProduct> =
            entities.iter().map(CachedProduct::from_entity).collect();

        if !products.is_empty() {
            if let Err(e) = store.set(&key, &products, config.cache_ttl()).await {
                tracing::warn!("Failed to cache category page {}: {}", key, e);
            }

            // 后台填充分区桶，不阻塞请求路径
            let store = store.clone();
            let pool = pool.clone();
            let ttl = config.cache_ttl();
            let partition_size = config.partition_size;
            tokio::spawn(async move {
                if let Err(e) = cache_category_partitions(
                    &store,
                    &pool,
                    ttl,
                    partition_size,
                    tenant_id,
                    category_id,
                )
                .await
                {
                    tracing::warn!(
                        "Partition fill failed for tenant {} category {}: {}",
                        tenant_id,
                        category_id,
                        e
                    );
                }
            });
        }

        Ok(products)
    }

    /// 全部产品分页读取
    pub async fn get_all_products(
        store: &CacheStore,
        pool: &PgPool,
        config: &Config,
        tenant_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<CachedProduct>, sqlx::Error> {
        let key = product_keys::all_products_page_key(tenant_id, page, page_size);

        match store.get::<Vec<CachedProduct>>(&key).await {
            Ok(Some(products)) => return Ok(products),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to database: {}", key, e);
            }
        }

        let entities = ProductRepository::list_all(pool, tenant_id, page, page_size).await?;
        let products: Vec<CachedProduct> =
            entities.iter().map(CachedProduct::from_entity).collect();

        if !products.is_empty() {
            if let Err(e) = store.set(&key, &products, config.cache_ttl()).await {
                tracing::warn!("Failed to cache all-products page {}: {}", key, e);
            }
        }

        Ok(products)
    }

    /// 缓存单个产品快照并把其ID登记到所属分区
    pub async fn cache_product(
        store: &CacheStore,
        config: &Config,
        product: &CachedProduct,
    ) -> Result<(), redis::RedisError> {
        let key = product_keys::product_key(product.tenant_id, product.product_id);
        store.set(&key, product, config.cache_ttl()).await?;

        let partition = product_keys::partition_index(product.product_id, config.partition_size);
        let partition_key = product_keys::partition_key(product.tenant_id, partition);

        // 读改写，非原子：并发写同一分区可能丢失更新（已知竞态）
        let mut ids: Vec<i32> = store.get(&partition_key).await?.unwrap_or_default();
        if !ids.contains(&product.product_id) {
            ids.push(product.product_id);
            store.set(&partition_key, &ids, config.cache_ttl()).await?;
        }

        Ok(())
    }

    /// 数据源写提交后的写穿透：先删再立即重填，避免写后出现未命中风暴
    pub async fn refresh_product_after_write(
        store: &CacheStore,
        pool: &PgPool,
        config: &Config,
        tenant_id: i32,
        product_id: i32,
    ) -> Result<(), sqlx::Error> {
        let key = product_keys::product_key(tenant_id, product_id);
        if let Err(e) = store.delete(&key).await {
            tracing::warn!("Failed to delete cached product {}: {}", key, e);
        }

        let entity = ProductRepository::find_active(pool, tenant_id, product_id).await?;

        if let Some(entity) = entity {
            let product = CachedProduct::from_entity(&entity);
            if let Err(e) = Self::cache_product(store, config, &product).await {
                tracing::warn!("Failed to repopulate product {}: {}", product_id, e);
            }
            Self::invalidate_category(store, tenant_id, entity.category_id).await;
        }

        Self::invalidate_all_products(store, tenant_id).await;

        Ok(())
    }

    /// 从缓存中移除产品（删除后调用），幂等
    pub async fn remove_product_from_cache(
        store: &CacheStore,
        pool: &PgPool,
        config: &Config,
        tenant_id: i32,
        product_id: i32,
    ) -> Result<(), sqlx::Error> {
        let key = product_keys::product_key(tenant_id, product_id);
        if let Err(e) = store.delete(&key).await {
            tracing::warn!("Failed to delete cached product {}: {}", key, e);
        }

        // 包含软删除行的查询：需要分类信息来失效分页缓存
        let entity = ProductRepository::find_any(pool, product_id).await?;

        if let Some(entity) = entity.filter(|p| p.tenant_id == tenant_id) {
            Self::invalidate_category(store, tenant_id, entity.category_id).await;

            let partition = product_keys::partition_index(product_id, config.partition_size);
            let partition_key = product_keys::partition_key(tenant_id, partition);

            match store.get::<Vec<i32>>(&partition_key).await {
                Ok(Some(mut ids)) if ids.contains(&product_id) => {
                    ids.retain(|&id| id != product_id);
                    let result = if ids.is_empty() {
                        store.delete(&partition_key).await
                    } else {
                        store.set(&partition_key, &ids, config.cache_ttl()).await
                    };
                    if let Err(e) = result {
                        tracing::warn!("Failed to update partition {}: {}", partition_key, e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read partition {}: {}", partition_key, e);
                }
            }
        }

        Self::invalidate_all_products(store, tenant_id).await;

        Ok(())
    }

    /// 按前缀删除分类的全部分页缓存，尽力而为
    pub async fn invalidate_category(store: &CacheStore, tenant_id: i32, category_id: i32) {
        let prefix = product_keys::category_products_prefix(tenant_id, category_id);
        match store.delete_by_prefix(&prefix).await {
            Ok(count) => {
                tracing::debug!("Invalidated {} keys under {}", count, prefix);
            }
            Err(e) => {
                tracing::warn!("Failed to invalidate category prefix {}: {}", prefix, e);
            }
        }
    }

    /// 删除单个产品的缓存键，尽力而为
    pub async fn invalidate_product(store: &CacheStore, tenant_id: i32, product_id: i32) {
        let key = product_keys::product_key(tenant_id, product_id);
        if let Err(e) = store.delete(&key).await {
            tracing::warn!("Failed to invalidate product {}: {}", key, e);
        }
    }

    /// 删除全部产品列表的分页缓存，尽力而为
    async fn invalidate_all_products(store: &CacheStore, tenant_id: i32) {
        let prefix = product_keys::all_products_prefix(tenant_id);
        if let Err(e) = store.delete_by_prefix(&prefix).await {
            tracing::warn!("Failed to invalidate all-products prefix {}: {}", prefix, e);
        }
    }

    /// 缓存预热：填充产品数量前N的分类首页和全部产品首页
    /// 在租户启用或进程启动时调用，不在请求路径上
    pub async fn warmup(
        store: &CacheStore,
        pool: &PgPool,
        config: &Config,
        tenant_id: i32,
    ) -> Result<(), sqlx::Error> {
        let categories =
            ProductRepository::top_categories(pool, tenant_id, config.warmup_category_count)
                .await?;

        for category_id in categories {
            Self::get_products_by_category(store, pool, config, tenant_id, category_id, 1, 50)
                .await?;
        }

        Self::get_all_products(store, pool, config, tenant_id, 1, 50).await?;

        tracing::info!("Cache warmup completed for tenant {}", tenant_id);
        Ok(())
    }
}

/// 枚举分类的全部产品ID并合并进分区桶
async fn cache_category_partitions(
    store: &CacheStore,
    pool: &PgPool,
    ttl: std::time::Duration,
    partition_size: i32,
    tenant_id: i32,
    category_id: i32,
) -> Result<(), sqlx::Error> {
    let ids = ProductRepository::list_category_product_ids(pool, tenant_id, category_id).await?;
    let partitions = group_into_partitions(&ids, partition_size);

    for (partition, mut ids) in partitions {
        let partition_key = product_keys::partition_key(tenant_id, partition);

        // 与现有分区成员合并，避免覆盖其他分类的产品ID
        match store.get::<Vec<i32>>(&partition_key).await {
            Ok(Some(existing)) => {
                for id in existing {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to read partition {}: {}", partition_key, e);
                continue;
            }
        }

        ids.sort_unstable();
        if let Err(e) = store.set(&partition_key, &ids, ttl).await {
            tracing::warn!("Failed to write partition {}: {}", partition_key, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{ProductLocks, group_into_partitions};

    #[test]
    fn same_product_id_gets_same_lock() {
        let locks = ProductLocks::new();
        let a = locks.lock_for(42);
        let b = locks.lock_for(42);
        let c = locks.lock_for(43);

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn concurrent_misses_collapse_to_single_load() {
        let locks = Arc::new(ProductLocks::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let cached: Arc<tokio::sync::RwLock<Option<u32>>> = Arc::new(tokio::sync::RwLock::new(None));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let locks = locks.clone();
            let loads = loads.clone();
            let cached = cached.clone();
            handles.push(tokio::spawn(async move {
                // 与 get_product 相同的双重检查序列
                if cached.read().await.is_some() {
                    return;
                }
                let lock = locks.lock_for(42);
                let _guard = lock.lock().await;
                if cached.read().await.is_some() {
                    return;
                }
                loads.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                *cached.write().await = Some(7);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(*cached.read().await, Some(7));
    }

    #[test]
    fn partition_grouping_by_width() {
        let partitions = group_into_partitions(&[0, 999, 1000, 2500], 1000);

        assert_eq!(partitions.len(), 3);
        assert_eq!(partitions[&0], vec![0, 999]);
        assert_eq!(partitions[&1], vec![1000]);
        assert_eq!(partitions[&2], vec![2500]);
    }

    #[test]
    fn partition_removal_is_idempotent() {
        // remove_product_from_cache 的分区收缩逻辑：重复移除不改变结果
        let mut ids = vec![1, 2, 3];
        ids.retain(|&id| id != 2);
        assert_eq!(ids, vec![1, 3]);
        ids.retain(|&id| id != 2);
        assert_eq!(ids, vec![1, 3]);
    }
}
