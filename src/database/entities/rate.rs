// 汇率实体
// 汇率与租户无关，全局共享

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 汇率实体，对应数据库中的汇率表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExchangeRateEntity {
    /// 货币代码（3位）
    pub currency_code: String,
    /// 相对基准货币的汇率
    pub rate: f64,
    /// 最后更新时间
    pub update_date: DateTime<Utc>,
}
