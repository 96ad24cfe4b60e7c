use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::database::entities::tenant::TenantEntity;

struct CacheEntry {
    tenant: TenantEntity,
    expires_at: Instant,
}

/// 进程内租户缓存，滑动过期
///
/// 追加为主的共享可变映射：同一键的并发填充允许竞争，
/// 后写者胜出，值等价。过期条目在访问时清除，不观察租户写入。
pub struct TenantCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TenantCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// 读取缓存，命中时刷新滑动过期时间
    pub fn get(&self, key: &str) -> Option<TenantEntity> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get_mut(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                entry.expires_at = Instant::now() + self.ttl;
                Some(entry.tenant.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// 写入缓存
    pub fn insert(&self, key: String, tenant: TenantEntity) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                tenant,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::TenantCache;
    use crate::database::entities::tenant::TenantEntity;

    fn tenant(id: i32) -> TenantEntity {
        TenantEntity {
            tenant_id: id,
            name: format!("tenant-{}", id),
            domain: format!("t{}.example.com", id),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_get() {
        let cache = TenantCache::new(Duration::from_secs(60));
        cache.insert("tenant_domain_a.example.com".into(), tenant(1));

        let hit = cache.get("tenant_domain_a.example.com").unwrap();
        assert_eq!(hit.tenant_id, 1);
        assert!(cache.get("tenant_domain_b.example.com").is_none());
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = TenantCache::new(Duration::from_millis(10));
        cache.insert("k".into(), tenant(1));

        std::thread::sleep(Duration::from_millis(25));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn hit_slides_the_expiration() {
        let cache = TenantCache::new(Duration::from_millis(60));
        cache.insert("k".into(), tenant(1));

        // 持续访问使条目超过初始TTL仍然存活
        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(30));
            assert!(cache.get("k").is_some());
        }
    }

    #[test]
    fn last_writer_wins_on_reinsert() {
        let cache = TenantCache::new(Duration::from_secs(60));
        cache.insert("k".into(), tenant(1));
        cache.insert("k".into(), tenant(2));

        assert_eq!(cache.get("k").unwrap().tenant_id, 2);
    }
}
