//! Catalog business logic.

mod auth_service;
mod authorizer;
mod bootstrap;
mod category_service;
mod container;
mod product_service;
mod token_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator};
pub use authorizer::{Authorizer, Gate};
pub use bootstrap::{seed_admin, seed_catalog};
pub use category_service::{CategoryManager, CategoryService};
pub use container::Services;
pub use product_service::{ProductManager, ProductService};
pub use token_service::{Claims, IssuedToken, JwtTokens, TokenService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenService;

use common::{AppError, AppResult};
use uuid::Uuid;

/// Parse an opaque identifier. A malformed id cannot name a stored record,
/// so it reads as `NotFound(entity)`.
pub(crate) fn parse_id(raw: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(entity))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::infra::UnitOfWork;
    use crate::repository::{
        CategoryRepository, MockCategoryRepository, MockProductRepository, MockUserRepository,
        ProductRepository, UserRepository,
    };
    use common::AppResult;
    use domain::{Password, User};

    pub fn sample_user(email: &str, username: &str) -> User {
        User::new(
            email.to_string(),
            username.to_string(),
            Password::from_hash("$argon2id$not-a-real-digest"),
        )
    }

    /// Unit of work over mock repositories. Unset repositories are fresh
    /// mocks with no expectations, so any call to them fails the test.
    pub struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
        categories: Arc<MockCategoryRepository>,
        products: Arc<MockProductRepository>,
    }

    impl Default for TestUnitOfWork {
        fn default() -> Self {
            Self {
                users: Arc::new(MockUserRepository::new()),
                categories: Arc::new(MockCategoryRepository::new()),
                products: Arc::new(MockProductRepository::new()),
            }
        }
    }

    impl TestUnitOfWork {
        pub fn with_users(mut self, users: MockUserRepository) -> Self {
            self.users = Arc::new(users);
            self
        }

        pub fn with_categories(mut self, categories: MockCategoryRepository) -> Self {
            self.categories = Arc::new(categories);
            self
        }

        pub fn with_products(mut self, products: MockProductRepository) -> Self {
            self.products = Arc::new(products);
            self
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn categories(&self) -> Arc<dyn CategoryRepository> {
            self.categories.clone()
        }

        fn products(&self) -> Arc<dyn ProductRepository> {
            self.products.clone()
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "User").unwrap(), id);
        assert!(matches!(
            parse_id("60d21b4967d0d8992e610c85", "User"),
            Err(AppError::NotFound(what)) if what == "User"
        ));
    }
}
