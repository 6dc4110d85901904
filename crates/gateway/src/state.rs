//! Application state for dependency injection.

use std::sync::Arc;

use catalog_service_lib::infra::UnitOfWork;
use catalog_service_lib::service::{
    AuthService, Authorizer, CategoryService, ProductService, Services, UserService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub category_service: Arc<dyn CategoryService>,
    pub product_service: Arc<dyn ProductService>,
    pub authorizer: Arc<Authorizer>,
    pub storage: Arc<dyn UnitOfWork>,
}

impl AppState {
    /// Create new app state.
    pub fn new(services: &Services) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            category_service: services.categories(),
            product_service: services.products(),
            authorizer: services.authorizer(),
            storage: services.storage(),
        }
    }
}
