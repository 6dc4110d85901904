//! Service wiring.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, Authorizer, CategoryManager, CategoryService, ProductManager,
    ProductService, TokenService, UserManager, UserService,
};
use crate::infra::UnitOfWork;

/// Every catalog service built over one shared unit of work.
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    categories: Arc<dyn CategoryService>,
    products: Arc<dyn ProductService>,
    authorizer: Arc<Authorizer>,
    uow: Arc<dyn UnitOfWork>,
}

impl Services {
    pub fn new(uow: Arc<dyn UnitOfWork>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), tokens.clone())),
            users: Arc::new(UserManager::new(uow.clone())),
            categories: Arc::new(CategoryManager::new(uow.clone())),
            products: Arc::new(ProductManager::new(uow.clone())),
            authorizer: Arc::new(Authorizer::new(uow.clone(), tokens)),
            uow,
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    pub fn categories(&self) -> Arc<dyn CategoryService> {
        self.categories.clone()
    }

    pub fn products(&self) -> Arc<dyn ProductService> {
        self.products.clone()
    }

    pub fn authorizer(&self) -> Arc<Authorizer> {
        self.authorizer.clone()
    }

    /// Storage handle, for health probes
    pub fn storage(&self) -> Arc<dyn UnitOfWork> {
        self.uow.clone()
    }
}
