use sqlx::PgPool;

use crate::cache::keys::tenant_keys;
use crate::database::entities::tenant::TenantEntity;
use crate::database::repositories::tenant::TenantRepository;
use crate::tenant::cache::TenantCache;

/// 管理路径使用的默认租户ID
pub const DEFAULT_ADMIN_TENANT_ID: i32 = 0;

/// 请求上下文中携带的租户信息
/// 下游处理器通过显式参数使用 tenant_id，不依赖隐式环境
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: i32,
    pub tenant_name: String,
}

impl TenantContext {
    /// 管理路径的合成默认租户
    pub fn admin_default() -> Self {
        Self {
            tenant_id: DEFAULT_ADMIN_TENANT_ID,
            tenant_name: "Admin".into(),
        }
    }
}

/// 租户解析操作
///
/// 解析租户绝不能让请求管线崩溃：查询数据源的任何故障
/// 都被捕获并记录，按"未解析"处理。
pub struct TenantResolver;

impl TenantResolver {
    /// 按域名解析启用的租户，域名统一转为小写
    pub async fn get_by_domain(
        pool: &PgPool,
        cache: &TenantCache,
        domain: &str,
    ) -> Option<TenantEntity> {
        if domain.trim().is_empty() {
            tracing::warn!("Tenant lookup called with empty domain");
            return None;
        }

        let cache_key = tenant_keys::tenant_domain_key(domain);

        if let Some(tenant) = cache.get(&cache_key) {
            tracing::debug!("Tenant {} resolved from local cache", domain);
            return Some(tenant);
        }

        match TenantRepository::find_active_by_domain(pool, domain).await {
            Ok(Some(tenant)) => {
                tracing::info!("Tenant resolved: {} - {}", tenant.tenant_id, tenant.name);
                cache.insert(cache_key, tenant.clone());
                Some(tenant)
            }
            Ok(None) => {
                tracing::warn!("No active tenant for domain {}", domain);
                None
            }
            Err(e) => {
                tracing::error!("Tenant lookup failed for domain {}: {}", domain, e);
                None
            }
        }
    }

    /// 按ID解析启用的租户，与域名解析共享同一本地缓存和故障策略
    pub async fn get_by_id(
        pool: &PgPool,
        cache: &TenantCache,
        tenant_id: i32,
    ) -> Option<TenantEntity> {
        if tenant_id <= 0 {
            tracing::warn!("Tenant lookup called with invalid id {}", tenant_id);
            return None;
        }

        let cache_key = tenant_keys::tenant_id_key(tenant_id);

        if let Some(tenant) = cache.get(&cache_key) {
            tracing::debug!("Tenant {} resolved from local cache", tenant_id);
            return Some(tenant);
        }

        match TenantRepository::find_active_by_id(pool, tenant_id).await {
            Ok(Some(tenant)) => {
                tracing::info!("Tenant resolved: {} - {}", tenant.tenant_id, tenant.name);
                cache.insert(cache_key, tenant.clone());
                Some(tenant)
            }
            Ok(None) => {
                tracing::warn!("No active tenant with id {}", tenant_id);
                None
            }
            Err(e) => {
                tracing::error!("Tenant lookup failed for id {}: {}", tenant_id, e);
                None
            }
        }
    }

    /// 检查租户是否启用
    pub async fn is_active(pool: &PgPool, cache: &TenantCache, tenant_id: i32) -> bool {
        Self::get_by_id(pool, cache, tenant_id)
            .await
            .map(|t| t.is_active)
            .unwrap_or(false)
    }
}

/// 判断请求路径是否命中管理路径白名单
/// 段前缀匹配，大小写不敏感："/Admin/Home" 命中 "/admin"
pub fn is_admin_path(admin_paths: &[String], path: &str) -> bool {
    let path = path.to_lowercase();
    admin_paths.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::is_admin_path;

    fn allow_list() -> Vec<String> {
        vec!["/admin".into(), "/account".into(), "/api/admin".into()]
    }

    #[test]
    fn admin_home_matches_case_insensitively() {
        assert!(is_admin_path(&allow_list(), "/Admin/Home"));
        assert!(is_admin_path(&allow_list(), "/admin"));
        assert!(is_admin_path(&allow_list(), "/Account/Login"));
        assert!(is_admin_path(&allow_list(), "/api/admin/products"));
    }

    #[test]
    fn catalog_path_is_rejected() {
        assert!(!is_admin_path(&allow_list(), "/Catalog"));
        assert!(!is_admin_path(&allow_list(), "/"));
    }

    #[test]
    fn prefix_matches_on_segment_boundary_only() {
        // "/administrator" 不是 "/admin" 的段前缀
        assert!(!is_admin_path(&allow_list(), "/administrator"));
        assert!(!is_admin_path(&allow_list(), "/accounting/report"));
    }
}
