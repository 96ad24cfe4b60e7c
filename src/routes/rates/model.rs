use serde::Serialize;

use crate::cache::models::rate::CachedRate;

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub rates: Vec<CachedRate>,
}
