mod handler;
mod model;

pub use handler::{get_current_rates, get_rate, rates_ws};
