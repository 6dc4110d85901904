//! HTTP handlers grouped by resource.

pub mod auth_handler;
pub mod category_handler;
pub mod health_handler;
pub mod product_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use category_handler::category_routes;
pub use health_handler::health_routes;
pub use product_handler::product_routes;
pub use user_handler::user_routes;

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use domain::{Page, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};

/// `skip`/`limit` window shared by every list endpoint
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Number of records to skip
    #[serde(default = "default_skip")]
    pub skip: u64,
    /// Maximum records to return (capped at 1000)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

pub(crate) fn default_skip() -> u64 {
    DEFAULT_PAGE_OFFSET
}

pub(crate) fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}
