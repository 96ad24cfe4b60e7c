// 数据库实体定义

pub mod product;
pub mod rate;
pub mod tenant;
