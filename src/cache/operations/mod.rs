/// 缓存操作
/// 提供缓存操作的功能实现

// 产品缓存操作
pub mod product;

// 汇率缓存操作
pub mod rate;

// 重新导出常用操作
pub use product::{ProductCacheOperations, ProductLocks};
pub use rate::RateCacheOperations;
