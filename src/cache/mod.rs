// 缓存模块
// 包含缓存键生成、缓存数据结构和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

// 重新导出常用类型和函数，方便其他模块使用
pub use models::product::CachedProduct;
pub use models::rate::CachedRate;
pub use operations::product::{ProductCacheOperations, ProductLocks};
pub use store::CacheStore;
