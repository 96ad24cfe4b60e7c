/// 缓存键模块
/// 提供各种缓存键生成函数
///
/// 键格式必须保持稳定，已有缓存数据依赖这些格式。

// 产品缓存键模块
pub mod product_keys;

// 汇率缓存键模块
pub mod rate_keys;

// 租户缓存键模块
pub mod tenant_keys;

// 重新导出常用的键生成函数
pub use product_keys::{
    all_products_page_key, all_products_prefix, category_products_page_key,
    category_products_prefix, partition_index, partition_key, product_key,
};
pub use rate_keys::CURRENT_RATES_KEY;
pub use tenant_keys::{tenant_domain_key, tenant_id_key};
