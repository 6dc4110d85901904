//! Domain layer - catalog entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod category;
pub mod constants;
pub mod error;
pub mod page;
pub mod password;
pub mod product;
pub mod user;

pub use category::{Category, CategoryPatch, NewCategory};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use page::Page;
pub use password::Password;
pub use product::{NewProduct, Product, ProductFilter, ProductPatch};
pub use user::{User, UserChanges, UserPatch, UserResponse};
