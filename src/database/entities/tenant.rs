// 租户实体
// 本子系统只读租户数据，租户的创建由独立的开通流程负责

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 租户实体，对应数据库中的租户表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenantEntity {
    /// 租户ID
    pub tenant_id: i32,
    /// 租户显示名称
    pub name: String,
    /// 租户域名（大小写不敏感的查找键）
    pub domain: String,
    /// 是否启用
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}
