use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::AppError,
    tenant::{TenantContext, TenantResolver, is_admin_path},
};

/// 租户解析中间件
///
/// 每个请求：Host头 -> 租户，解析结果作为 TenantContext 扩展注入请求。
/// 未解析且非管理路径时返回404，后续处理器不会执行。
pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 取Host头并去掉端口
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_lowercase())
        .unwrap_or_default();
    let path = req.uri().path().to_string();

    tracing::debug!("Resolving tenant. Host: {}, Path: {}", host, path);

    let tenant = TenantResolver::get_by_domain(&state.pool, &state.tenant_cache, &host).await;

    let context = match tenant {
        Some(tenant) => TenantContext {
            tenant_id: tenant.tenant_id,
            tenant_name: tenant.name,
        },
        None if is_admin_path(&state.config.admin_paths, &path) => {
            tracing::info!("Using default tenant for admin path {}", path);
            TenantContext::admin_default()
        }
        None => {
            tracing::warn!("Tenant not found and not an admin path. Host: {}, Path: {}", host, path);
            return AppError::TenantNotFound.into_response();
        }
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}
