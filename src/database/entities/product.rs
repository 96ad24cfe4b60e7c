// 产品实体
// 定义产品目录相关的数据库实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 产品实体，对应数据库中的产品表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductEntity {
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
    /// 创建时间
    pub created_at: DateTime<Utc>,
}
