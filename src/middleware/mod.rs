mod error_handler;
mod tenant;

pub use error_handler::log_errors;
pub use tenant::tenant_middleware;
