// 缓存数据模型
// 缓存中存放的是数据库行的去规范化快照

pub mod product;
pub mod rate;

pub use product::CachedProduct;
pub use rate::CachedRate;
