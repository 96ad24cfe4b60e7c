use chrono::Utc;
use sqlx::PgPool;

use crate::cache::models::rate::CachedRate;
use crate::database::entities::rate::ExchangeRateEntity;

/// 汇率存储库实现
pub struct RateRepository;

impl RateRepository {
    /// 在单个事务内整体替换汇率集合
    /// 要么全部写入，要么全部不写，不允许新旧汇率混合提交
    pub async fn replace_all(pool: &PgPool, rates: &[CachedRate]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM exchange_rates")
            .execute(&mut *tx)
            .await?;

        for rate in rates {
            sqlx::query(
                "INSERT INTO exchange_rates (currency_code, rate, update_date) \
                 VALUES ($1, $2, $3)",
            )
            .bind(&rate.currency_code)
            .bind(rate.rate)
            .bind(rate.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// 查询新鲜度窗口内更新过的汇率
    pub async fn find_recent(
        pool: &PgPool,
        max_age: chrono::Duration,
    ) -> Result<Vec<ExchangeRateEntity>, sqlx::Error> {
        let cutoff = Utc::now() - max_age;

        sqlx::query_as::<_, ExchangeRateEntity>(
            "SELECT currency_code, rate, update_date FROM exchange_rates \
             WHERE update_date >= $1 ORDER BY currency_code",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }
}
