use serde::Serialize;
use tokio::sync::broadcast;

use crate::cache::models::rate::CachedRate;

/// 广播事件名
pub const RATES_UPDATE_EVENT: &str = "rates:update";

/// 推送给订阅者的汇率更新事件，携带完整汇率集合
#[derive(Debug, Clone, Serialize)]
pub struct RateUpdateEvent {
    pub event: &'static str,
    pub rates: Vec<CachedRate>,
}

impl RateUpdateEvent {
    pub fn new(rates: Vec<CachedRate>) -> Self {
        Self {
            event: RATES_UPDATE_EVENT,
            rates,
        }
    }
}

/// 创建汇率广播通道
/// 单生产者（后台更新器）对多订阅者扇出，投递尽力而为，
/// 无确认无回放：晚接入的订阅者等待下一次推送即可。
pub fn channel() -> broadcast::Sender<RateUpdateEvent> {
    let (tx, _) = broadcast::channel(16);
    tx
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{RateUpdateEvent, channel};
    use crate::cache::models::rate::CachedRate;

    fn event() -> RateUpdateEvent {
        RateUpdateEvent::new(vec![CachedRate {
            currency_code: "TRY".into(),
            rate: 32.5,
            updated_at: Utc::now(),
        }])
    }

    #[tokio::test]
    async fn fan_out_reaches_all_subscribers() {
        let tx = channel();
        let mut rx1 = tx.subscribe();
        let mut rx2 = tx.subscribe();

        tx.send(event()).unwrap();

        assert_eq!(rx1.recv().await.unwrap().event, "rates:update");
        assert_eq!(rx2.recv().await.unwrap().rates.len(), 1);
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_affect_others() {
        let tx = channel();
        let rx1 = tx.subscribe();
        let mut rx2 = tx.subscribe();

        drop(rx1);
        tx.send(event()).unwrap();

        assert!(rx2.recv().await.is_ok());
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let tx = channel();
        let mut rx0 = tx.subscribe();
        tx.send(event()).unwrap();
        let _ = rx0.recv().await;

        let mut late = tx.subscribe();
        tx.send(event()).unwrap();

        // 晚接入者只能看到订阅之后的事件
        assert!(late.recv().await.is_ok());
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn event_serializes_with_name() {
        let json = serde_json::to_string(&event()).unwrap();
        assert!(json.contains(r#""event":"rates:update""#));
        assert!(json.contains(r#""currency_code":"TRY""#));
    }
}
