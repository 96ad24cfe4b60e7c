use serde::Deserialize;

/// 管理接口在默认租户路径下运行，目标租户ID由请求显式携带

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub tenant_id: i32,
    pub product_name: String,
    pub category_id: i32,
    pub price: f64,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub tenant_id: i32,
    pub product_name: String,
    pub category_id: i32,
    pub price: f64,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TenantSelector {
    pub tenant_id: i32,
}
