use sqlx::PgPool;

use crate::database::entities::tenant::TenantEntity;

/// 租户存储库实现
/// 本子系统只读租户表
pub struct TenantRepository;

impl TenantRepository {
    /// 按域名查询启用的租户，大小写不敏感
    pub async fn find_active_by_domain(
        pool: &PgPool,
        domain: &str,
    ) -> Result<Option<TenantEntity>, sqlx::Error> {
        sqlx::query_as::<_, TenantEntity>(
            "SELECT tenant_id, name, domain, is_active, created_at FROM tenants \
             WHERE LOWER(domain) = LOWER($1) AND is_active = true",
        )
        .bind(domain)
        .fetch_optional(pool)
        .await
    }

    /// 按ID查询启用的租户
    pub async fn find_active_by_id(
        pool: &PgPool,
        tenant_id: i32,
    ) -> Result<Option<TenantEntity>, sqlx::Error> {
        sqlx::query_as::<_, TenantEntity>(
            "SELECT tenant_id, name, domain, is_active, created_at FROM tenants \
             WHERE tenant_id = $1 AND is_active = true",
        )
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }
}
