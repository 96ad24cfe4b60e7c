// 租户模块
// 多租户架构的核心：按请求域名解析租户并隔离数据

pub mod cache;
pub mod resolver;

pub use cache::TenantCache;
pub use resolver::{DEFAULT_ADMIN_TENANT_ID, TenantContext, TenantResolver, is_admin_path};
