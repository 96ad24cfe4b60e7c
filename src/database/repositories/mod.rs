// 存储库操作实现

pub mod product;
pub mod rate;
pub mod tenant;
