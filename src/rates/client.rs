use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::watch;

use crate::cache::models::rate::CachedRate;
use crate::config::Config;

/// 外部汇率源的响应结构
#[derive(Debug, Deserialize)]
pub struct RateFeedResponse {
    /// 基准货币代码
    pub base: String,
    /// 源侧最后更新时间戳
    #[serde(default)]
    pub time_last_updated: i64,
    /// 货币代码 -> 汇率
    pub rates: HashMap<String, f64>,
}

/// 汇率拉取故障分类
///
/// 传输故障、超时、非2xx状态和畸形响应可重试；
/// 认证类故障视为永久性，不重试。
#[derive(Debug)]
pub enum FetchError {
    Transport(reqwest::Error),
    Status(StatusCode),
    MalformedResponse(String),
    Unauthorized(StatusCode),
    Cancelled,
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status(_) => true,
            FetchError::MalformedResponse(_) => true,
            FetchError::Unauthorized(_) => false,
            FetchError::Cancelled => false,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "transport error: {}", e),
            FetchError::Status(code) => write!(f, "unexpected status: {}", code),
            FetchError::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            FetchError::Unauthorized(code) => write!(f, "authentication failure: {}", code),
            FetchError::Cancelled => write!(f, "fetch cancelled"),
        }
    }
}

impl std::error::Error for FetchError {}

/// 指数退避延迟：base * 2^(attempt-1)
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// 外部汇率源客户端
#[derive(Clone)]
pub struct RateFeedClient {
    http: reqwest::Client,
    feed_url: String,
    max_attempts: u32,
    base_backoff: Duration,
}

impl RateFeedClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            feed_url: config.rate_feed_url.clone(),
            max_attempts: config.rate_retry_attempts,
            base_backoff: config.rate_retry_base(),
        }
    }

    /// 单次拉取并分类故障
    pub async fn fetch_latest(&self) -> Result<Vec<CachedRate>, FetchError> {
        let response = self
            .http
            .get(&self.feed_url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized(status));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let feed: RateFeedResponse = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        if feed.rates.is_empty() {
            return Err(FetchError::MalformedResponse(format!(
                "empty rate map for base {}",
                feed.base
            )));
        }

        let now = Utc::now();
        let mut rates: Vec<CachedRate> = feed
            .rates
            .into_iter()
            .map(|(currency_code, rate)| CachedRate {
                currency_code,
                rate,
                updated_at: now,
            })
            .collect();
        rates.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));

        Ok(rates)
    }

    /// 带重试的拉取，退避等待期间同时监听取消信号
    pub async fn fetch_with_retry(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Vec<CachedRate>, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_latest().await {
                Ok(rates) => return Ok(rates),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = backoff_delay(self.base_backoff, attempt);
                    tracing::warn!(
                        "Rate fetch attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown.changed() => return Err(FetchError::Cancelled),
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::{FetchError, backoff_delay};

    #[test]
    fn backoff_doubles_from_base() {
        let base = Duration::from_secs(1);
        // 两次失败后第三次尝试之前：约1秒、2秒
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
    }

    #[test]
    fn retryable_classification() {
        assert!(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(FetchError::Status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(FetchError::MalformedResponse("bad json".into()).is_retryable());
        assert!(!FetchError::Unauthorized(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!FetchError::Cancelled.is_retryable());
    }

    #[test]
    fn feed_response_parses() {
        let json = r#"{"base":"USD","time_last_updated":1700000000,"rates":{"TRY":32.5,"EUR":0.92}}"#;
        let feed: super::RateFeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(feed.base, "USD");
        assert_eq!(feed.rates.len(), 2);
        assert_eq!(feed.rates["TRY"], 32.5);
    }
}
