use serde::{Deserialize, Serialize};

use crate::cache::models::product::CachedProduct;

/// 分页参数，默认第1页、每页50条
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<CachedProduct>,
    pub page: i64,
    pub size: i64,
}
