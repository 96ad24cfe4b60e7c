// 汇率模块
// 后台定时拉取外部汇率源，落库、刷新缓存并向订阅者广播

pub mod broadcast;
pub mod client;
pub mod service;
pub mod updater;

pub use broadcast::RateUpdateEvent;
pub use client::{FetchError, RateFeedClient};
