/// 当前汇率集合的缓存键，汇率为全局共享，不带租户前缀
pub const CURRENT_RATES_KEY: &str = "rates:current";
