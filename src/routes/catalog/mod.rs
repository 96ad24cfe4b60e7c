mod handler;
mod model;

pub use handler::{get_all_products, get_product, get_products_by_category};
