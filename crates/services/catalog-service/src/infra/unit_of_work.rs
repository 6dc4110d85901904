//! Storage access point.
//!
//! A `UnitOfWork` hands out the three repositories and reports whether the
//! backing store is reachable. It is built once at startup and shared by
//! every service; no repository is reachable through global state.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::db::Database;
use crate::repository::{
    CategoryRepository, CategoryStore, ProductRepository, ProductStore, UserRepository, UserStore,
};
use common::{AppError, AppResult};

/// Repository access for services.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    /// `Unavailable` when the store cannot be reached
    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed unit of work
pub struct Persistence {
    db: Database,
    user_repo: Arc<UserStore>,
    category_repo: Arc<CategoryStore>,
    product_repo: Arc<ProductStore>,
}

impl Persistence {
    pub fn new(db: Database) -> Self {
        let connection: DatabaseConnection = db.get_connection();
        Self {
            user_repo: Arc::new(UserStore::new(connection.clone())),
            category_repo: Arc::new(CategoryStore::new(connection.clone())),
            product_repo: Arc::new(ProductStore::new(connection)),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await.map_err(|e| {
            tracing::warn!("Storage ping failed: {}", e);
            AppError::unavailable("Storage")
        })
    }
}
