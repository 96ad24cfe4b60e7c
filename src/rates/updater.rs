use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::AppState;
use crate::cache::operations::rate::RateCacheOperations;
use crate::database::repositories::rate::RateRepository;
use crate::rates::broadcast::RateUpdateEvent;
use crate::rates::client::{FetchError, RateFeedClient};

/// 受监督的汇率更新循环
///
/// 固定间隔：拉取（带重试）-> 事务内整体落库 -> 替换缓存 -> 广播。
/// 单次失败不终止循环，记录日志并冷却后恢复正常节奏；
/// 取消信号在任何等待点都会被及时观察到。
pub async fn run(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let client = RateFeedClient::new(&state.config);

    let mut ticker = tokio::time::interval(state.config.rate_refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Rate updater started, interval {}s",
        state.config.rate_refresh_secs
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        let rates = match client.fetch_with_retry(&mut shutdown).await {
            Ok(rates) => rates,
            Err(FetchError::Cancelled) => break,
            Err(e) => {
                tracing::error!("Rate fetch failed after retries: {}", e);
                if cooldown(&state, &mut shutdown).await {
                    break;
                }
                continue;
            }
        };

        // 全量落库，全有或全无
        if let Err(e) = RateRepository::replace_all(&state.pool, &rates).await {
            tracing::error!("Failed to persist rates: {}", e);
            if cooldown(&state, &mut shutdown).await {
                break;
            }
            continue;
        }

        // 缓存失败不影响本轮更新，数据源仍是权威
        if let Err(e) =
            RateCacheOperations::cache_rates(&state.store, &rates, state.config.cache_ttl()).await
        {
            tracing::warn!("Failed to cache rates: {}", e);
        }

        let count = rates.len();
        // 没有订阅者时send返回Err，属正常情况
        let _ = state.rates_tx.send(RateUpdateEvent::new(rates));

        tracing::debug!("Updated {} exchange rates", count);
    }

    tracing::info!("Rate updater stopped");
}

/// 失败后的短冷却，期间监听取消信号；返回true表示应退出
async fn cooldown(state: &AppState, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(state.config.rate_failure_cooldown()) => false,
        _ = shutdown.changed() => true,
    }
}
