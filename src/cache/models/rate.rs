use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::entities::rate::ExchangeRateEntity;

/// 汇率缓存快照，相对固定基准货币（USD）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRate {
    /// 货币代码（3位）
    pub currency_code: String,
    /// 相对基准货币的汇率
    pub rate: f64,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl CachedRate {
    pub fn from_entity(entity: &ExchangeRateEntity) -> Self {
        Self {
            currency_code: entity.currency_code.clone(),
            rate: entity.rate,
            updated_at: entity.update_date,
        }
    }
}
