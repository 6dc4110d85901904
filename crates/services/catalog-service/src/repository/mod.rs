//! Repository layer for data access.
//!
//! One trait per entity, each with a Postgres-backed store. The traits are
//! the storage seam: services only see `Arc<dyn ...Repository>`.

pub mod entities;
mod category_repository;
mod product_repository;
mod user_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
