use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::broadcast;

use cache::operations::product::ProductLocks;
use cache::store::CacheStore;
use config::Config;
use rates::broadcast::RateUpdateEvent;
use tenant::cache::TenantCache;

pub mod cache;
pub mod common;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod rates;
pub mod routes;
pub mod tenant;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub store: CacheStore,
    pub tenant_cache: Arc<TenantCache>,
    pub product_locks: Arc<ProductLocks>,
    pub rates_tx: broadcast::Sender<RateUpdateEvent>,
}
