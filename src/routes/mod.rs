// 路由模块

pub mod admin;
pub mod catalog;
pub mod rates;
