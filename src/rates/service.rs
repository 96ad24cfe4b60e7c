use chrono::Utc;

use crate::AppState;
use crate::cache::models::rate::CachedRate;
use crate::cache::operations::rate::RateCacheOperations;
use crate::database::repositories::rate::RateRepository;
use crate::rates::client::RateFeedClient;

/// 全部回退路径失败时返回的最后已知默认汇率
pub fn default_rates() -> Vec<CachedRate> {
    vec![CachedRate {
        currency_code: "USD".into(),
        rate: 1.0,
        updated_at: Utc::now(),
    }]
}

/// 读取当前汇率集合，供任何需要换算的调用方使用
///
/// 回退链：缓存 -> 新鲜度窗口内的数据库行 -> 同步拉取外部源 -> 固定默认集。
/// 绝不向调用方抛出故障。
pub async fn get_current_rates(state: &AppState) -> Vec<CachedRate> {
    match RateCacheOperations::get_cached_rates(&state.store).await {
        Ok(Some(rates)) if !rates.is_empty() => return rates,
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Rate cache read failed: {}", e);
        }
    }

    match RateRepository::find_recent(&state.pool, state.config.rate_freshness()).await {
        Ok(rows) if !rows.is_empty() => {
            let rates: Vec<CachedRate> = rows.iter().map(CachedRate::from_entity).collect();
            if let Err(e) =
                RateCacheOperations::cache_rates(&state.store, &rates, state.config.cache_ttl())
                    .await
            {
                tracing::warn!("Failed to re-cache rates from database: {}", e);
            }
            return rates;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Rate database read failed: {}", e);
        }
    }

    // 缓存和数据库都不可用或过期，同步拉取一次外部源
    let client = RateFeedClient::new(&state.config);
    match client.fetch_latest().await {
        Ok(rates) => {
            if let Err(e) = RateRepository::replace_all(&state.pool, &rates).await {
                tracing::warn!("Failed to persist synchronously fetched rates: {}", e);
            }
            if let Err(e) =
                RateCacheOperations::cache_rates(&state.store, &rates, state.config.cache_ttl())
                    .await
            {
                tracing::warn!("Failed to cache synchronously fetched rates: {}", e);
            }
            rates
        }
        Err(e) => {
            tracing::error!("All rate sources failed, using defaults: {}", e);
            default_rates()
        }
    }
}

/// 读取单个货币的当前汇率
pub async fn get_rate(state: &AppState, currency_code: &str) -> Option<CachedRate> {
    let code = currency_code.to_uppercase();
    get_current_rates(state)
        .await
        .into_iter()
        .find(|r| r.currency_code == code)
}

/// 在两种货币之间换算金额，汇率均相对基准货币（USD）
pub fn convert_amount(rates: &[CachedRate], amount: f64, from: &str, to: &str) -> Option<f64> {
    let from_rate = rates.iter().find(|r| r.currency_code == from)?.rate;
    let to_rate = rates.iter().find(|r| r.currency_code == to)?.rate;

    if from_rate == 0.0 {
        return None;
    }

    Some(amount / from_rate * to_rate)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{convert_amount, default_rates};
    use crate::cache::models::rate::CachedRate;

    fn rate(code: &str, rate: f64) -> CachedRate {
        CachedRate {
            currency_code: code.into(),
            rate,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn default_set_contains_base_currency() {
        let rates = default_rates();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].currency_code, "USD");
        assert_eq!(rates[0].rate, 1.0);
    }

    #[test]
    fn converts_through_base_currency() {
        let rates = vec![rate("USD", 1.0), rate("TRY", 32.0), rate("EUR", 0.8)];

        assert_eq!(convert_amount(&rates, 10.0, "USD", "TRY"), Some(320.0));
        assert_eq!(convert_amount(&rates, 320.0, "TRY", "USD"), Some(10.0));
        assert_eq!(convert_amount(&rates, 32.0, "TRY", "EUR"), Some(0.8));
    }

    #[test]
    fn unknown_currency_yields_none() {
        let rates = vec![rate("USD", 1.0)];
        assert!(convert_amount(&rates, 1.0, "USD", "XXX").is_none());
        assert!(convert_amount(&rates, 1.0, "XXX", "USD").is_none());
    }

    #[test]
    fn zero_rate_yields_none() {
        let rates = vec![rate("USD", 1.0), rate("BAD", 0.0)];
        assert!(convert_amount(&rates, 1.0, "BAD", "USD").is_none());
    }
}
