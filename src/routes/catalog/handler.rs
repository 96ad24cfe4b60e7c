use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    cache::operations::product::ProductCacheOperations,
    common::{error_codes, error_to_api_response, success_to_api_response},
    tenant::TenantContext,
};

use super::model::{Pagination, ProductListResponse};

#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(product_id): Path<i32>,
) -> impl IntoResponse {
    match ProductCacheOperations::get_product(
        &state.store,
        &state.pool,
        &state.product_locks,
        &state.config,
        tenant.tenant_id,
        product_id,
    )
    .await
    {
        Ok(Some(product)) => (StatusCode::OK, success_to_api_response(product)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "产品不存在".to_string()),
        ),
        Err(e) => {
            tracing::error!("Failed to load product {}: {}", product_id, e);
            (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "获取产品失败".to_string()),
            )
        }
    }
}

#[axum::debug_handler]
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(category_id): Path<i32>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    if pagination.page < 1 || pagination.size < 1 {
        return (
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, "无效的分页参数".to_string()),
        );
    }

    match ProductCacheOperations::get_products_by_category(
        &state.store,
        &state.pool,
        &state.config,
        tenant.tenant_id,
        category_id,
        pagination.page,
        pagination.size,
    )
    .await
    {
        Ok(products) => (
            StatusCode::OK,
            success_to_api_response(ProductListResponse {
                products,
                page: pagination.page,
                size: pagination.size,
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to load category {} products: {}", category_id, e);
            (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "获取产品列表失败".to_string()),
            )
        }
    }
}

#[axum::debug_handler]
pub async fn get_all_products(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    if pagination.page < 1 || pagination.size < 1 {
        return (
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, "无效的分页参数".to_string()),
        );
    }

    match ProductCacheOperations::get_all_products(
        &state.store,
        &state.pool,
        &state.config,
        tenant.tenant_id,
        pagination.page,
        pagination.size,
    )
    .await
    {
        Ok(products) => (
            StatusCode::OK,
            success_to_api_response(ProductListResponse {
                products,
                page: pagination.page,
                size: pagination.size,
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to load products for tenant {}: {}", tenant.tenant_id, e);
            (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "获取产品列表失败".to_string()),
            )
        }
    }
}
