use serde::{Deserialize, Serialize};

use crate::database::entities::product::ProductEntity;

/// 产品缓存快照
/// 快照是某一时刻的副本，过期时间由TTL限定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedProduct {
    /// 产品ID
    pub product_id: i32,
    /// 所属租户ID
    pub tenant_id: i32,
    /// 产品名称
    pub product_name: String,
    /// 所属分类ID
    pub category_id: i32,
    /// 价格（基准货币）
    pub price: f64,
    /// 图片路径
    pub image_path: Option<String>,
    /// 软删除标记
    pub is_deleted: bool,
    /// 缓存写入时间戳
    pub cached_at: i64,
}

impl CachedProduct {
    pub fn from_entity(entity: &ProductEntity) -> Self {
        Self {
            product_id: entity.product_id,
            tenant_id: entity.tenant_id,
            product_name: entity.product_name.clone(),
            category_id: entity.category_id,
            price: entity.price,
            image_path: entity.image_path.clone(),
            is_deleted: entity.is_deleted,
            cached_at: chrono::Utc::now().timestamp(),
        }
    }
}
