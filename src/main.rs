use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use catalog_backend::{
    AppState,
    cache::operations::product::ProductLocks,
    cache::store::CacheStore,
    config::Config,
    middleware::{log_errors, tenant_middleware},
    rates, routes,
    tenant::cache::TenantCache,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'catalog_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let store = CacheStore::new(Arc::new(redis_client));

    // 汇率广播通道
    let rates_tx = rates::broadcast::channel();

    // 设置应用状态
    let state = AppState {
        pool,
        config: config.clone(),
        store,
        tenant_cache: Arc::new(TenantCache::new(config.tenant_cache_ttl())),
        product_locks: Arc::new(ProductLocks::new()),
        rates_tx,
    };

    // 启动汇率后台更新器，带取消信号
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let updater = tokio::spawn(rates::updater::run(state.clone(), shutdown_rx));

    // 目录读取路由
    let catalog_routes = Router::new()
        .route("/catalog/products", get(routes::catalog::get_all_products))
        .route("/catalog/products/{id}", get(routes::catalog::get_product))
        .route(
            "/catalog/categories/{id}/products",
            get(routes::catalog::get_products_by_category),
        )
        .route("/rates", get(routes::rates::get_current_rates))
        .route("/rates/ws", get(routes::rates::rates_ws))
        .route("/rates/{code}", get(routes::rates::get_rate));

    // 管理路由：未匹配租户的请求在这些路径下落到默认租户
    let admin_routes = Router::new()
        .route("/api/admin/products", post(routes::admin::create_product))
        .route(
            "/api/admin/products/{id}",
            put(routes::admin::update_product).delete(routes::admin::delete_product),
        )
        .route("/api/admin/warmup", post(routes::admin::warmup_cache));

    let router = Router::new()
        .merge(catalog_routes)
        .merge(admin_routes)
        // 租户解析中间件对所有路由生效
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            tenant_middleware,
        ))
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state);

    // 仅在调试构建中启用CORS
    #[cfg(debug_assertions)]
    let router = router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let host: IpAddr = config
        .server_host
        .parse()
        .expect("Invalid SERVER_HOST address");
    let addr = SocketAddr::new(host, config.server_port);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .expect("Server error");

    // 等待更新器干净退出
    let _ = updater.await;
}
