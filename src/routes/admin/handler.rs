use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    cache::models::product::CachedProduct,
    cache::operations::product::ProductCacheOperations,
    common::{error_codes, error_to_api_response, success_to_api_response},
    database::repositories::product::ProductRepository,
    tenant::TenantResolver,
};

use super::model::{CreateProductRequest, TenantSelector, UpdateProductRequest};

/// 创建产品：先提交数据源，再执行写穿透序列
#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> impl IntoResponse {
    if !TenantResolver::is_active(&state.pool, &state.tenant_cache, req.tenant_id).await {
        return (
            StatusCode::OK,
            error_to_api_response(error_codes::TENANT_NOT_FOUND, "租户不存在或未启用".to_string()),
        );
    }

    let entity = match ProductRepository::create(
        &state.pool,
        req.tenant_id,
        &req.product_name,
        req.category_id,
        req.price,
        req.image_path.as_deref(),
    )
    .await
    {
        Ok(entity) => entity,
        Err(e) => {
            tracing::error!("Failed to create product: {}", e);
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "创建产品失败".to_string()),
            );
        }
    };

    if let Err(e) = ProductCacheOperations::refresh_product_after_write(
        &state.store,
        &state.pool,
        &state.config,
        entity.tenant_id,
        entity.product_id,
    )
    .await
    {
        tracing::warn!("Write-through failed for product {}: {}", entity.product_id, e);
    }

    (
        StatusCode::OK,
        success_to_api_response(CachedProduct::from_entity(&entity)),
    )
}

/// 更新产品：先提交数据源，再执行写穿透序列
#[axum::debug_handler]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    let updated = match ProductRepository::update(
        &state.pool,
        req.tenant_id,
        product_id,
        &req.product_name,
        req.category_id,
        req.price,
        req.image_path.as_deref(),
    )
    .await
    {
        Ok(Some(entity)) => entity,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                error_to_api_response(error_codes::NOT_FOUND, "产品不存在".to_string()),
            );
        }
        Err(e) => {
            tracing::error!("Failed to update product {}: {}", product_id, e);
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "更新产品失败".to_string()),
            );
        }
    };

    if let Err(e) = ProductCacheOperations::refresh_product_after_write(
        &state.store,
        &state.pool,
        &state.config,
        req.tenant_id,
        product_id,
    )
    .await
    {
        tracing::warn!("Write-through failed for product {}: {}", product_id, e);
    }

    (
        StatusCode::OK,
        success_to_api_response(CachedProduct::from_entity(&updated)),
    )
}

/// 软删除产品并清理缓存：产品键、分类分页、分区成员
#[axum::debug_handler]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(selector): Query<TenantSelector>,
) -> impl IntoResponse {
    match ProductRepository::soft_delete(&state.pool, selector.tenant_id, product_id).await {
        Ok(0) => {
            return (
                StatusCode::NOT_FOUND,
                error_to_api_response(error_codes::NOT_FOUND, "产品不存在".to_string()),
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to delete product {}: {}", product_id, e);
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "删除产品失败".to_string()),
            );
        }
    }

    if let Err(e) = ProductCacheOperations::remove_product_from_cache(
        &state.store,
        &state.pool,
        &state.config,
        selector.tenant_id,
        product_id,
    )
    .await
    {
        tracing::warn!("Cache cleanup failed for product {}: {}", product_id, e);
    }

    (StatusCode::OK, success_to_api_response(()))
}

/// 触发租户缓存预热，在租户启用后调用
#[axum::debug_handler]
pub async fn warmup_cache(
    State(state): State<AppState>,
    Json(req): Json<TenantSelector>,
) -> impl IntoResponse {
    match ProductCacheOperations::warmup(&state.store, &state.pool, &state.config, req.tenant_id)
        .await
    {
        Ok(()) => (StatusCode::OK, success_to_api_response(())),
        Err(e) => {
            tracing::error!("Warmup failed for tenant {}: {}", req.tenant_id, e);
            (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "缓存预热失败".to_string()),
            )
        }
    }
}
