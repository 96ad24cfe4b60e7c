mod handler;
mod model;

pub use handler::{create_product, delete_product, update_product, warmup_cache};
