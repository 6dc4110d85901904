//! Development bootstrap data: the administrator and a sample catalog.

use std::sync::Arc;

use rust_decimal::Decimal;

use common::{AdminSeedConfig, AppResult};
use domain::{
    user::normalize_email, user::validate_username, Category, NewCategory, NewProduct, Password,
    Product, User,
};

use crate::infra::UnitOfWork;

/// Ensure an active admin account exists for `config.email`.
///
/// An existing account with that email is left untouched. Returns whether a
/// new account was created.
pub async fn seed_admin(uow: Arc<dyn UnitOfWork>, config: &AdminSeedConfig) -> AppResult<bool> {
    let email = normalize_email(&config.email)?;
    let username = validate_username(&config.username)?;
    let users = uow.users();

    if users.find_by_email(&email).await?.is_some() {
        tracing::debug!(email = %email, "Admin account already present");
        return Ok(false);
    }

    let mut admin = User::new(email, username, Password::new(&config.password)?);
    admin.is_admin = true;
    let admin = users.insert(admin).await?;

    tracing::info!(user_id = %admin.id, "Bootstrap admin created");
    Ok(true)
}

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    cents: i64,
    stock: i64,
    tags: &'static [&'static str],
}

const SAMPLE_CATALOG: &[(&str, &str, &[SampleProduct])] = &[
    (
        "Electronics",
        "Electronic devices and gadgets",
        &[
            SampleProduct {
                name: "Smartphone X",
                description: "Latest smartphone with advanced features",
                cents: 69_999,
                stock: 50,
                tags: &["smartphone", "electronics", "mobile"],
            },
            SampleProduct {
                name: "Laptop Pro",
                description: "Professional laptop for work and entertainment",
                cents: 129_999,
                stock: 30,
                tags: &["laptop", "computer", "electronics"],
            },
        ],
    ),
    (
        "Clothing",
        "Apparel and fashion items",
        &[
            SampleProduct {
                name: "Cotton T-Shirt",
                description: "Comfortable cotton t-shirt",
                cents: 1_999,
                stock: 100,
                tags: &["clothing", "t-shirt", "fashion"],
            },
            SampleProduct {
                name: "Denim Jeans",
                description: "Classic denim jeans",
                cents: 4_999,
                stock: 80,
                tags: &["clothing", "jeans", "fashion"],
            },
        ],
    ),
    (
        "Books",
        "Books and publications",
        &[SampleProduct {
            name: "Programming Guide",
            description: "Comprehensive programming guide",
            cents: 3_499,
            stock: 40,
            tags: &["book", "programming", "learning"],
        }],
    ),
    (
        "Home & Kitchen",
        "Products for home and kitchen",
        &[SampleProduct {
            name: "Coffee Maker",
            description: "Automatic coffee maker for home",
            cents: 8_999,
            stock: 25,
            tags: &["kitchen", "appliance", "coffee"],
        }],
    ),
    (
        "Beauty & Personal Care",
        "Beauty products and personal care items",
        &[SampleProduct {
            name: "Facial Cleanser",
            description: "Gentle facial cleanser for all skin types",
            cents: 1_499,
            stock: 60,
            tags: &["beauty", "skincare", "facial"],
        }],
    ),
];

/// Fill an empty development catalog with sample categories and products.
///
/// Categories are matched by name. Products are only added to a category
/// that has none, so repeated runs leave the catalog as it is. Returns the
/// number of records created.
pub async fn seed_catalog(uow: Arc<dyn UnitOfWork>) -> AppResult<usize> {
    let categories = uow.categories();
    let products = uow.products();
    let mut created = 0;

    for (name, description, samples) in SAMPLE_CATALOG {
        let category = match categories.find_by_name(name).await? {
            Some(existing) => existing,
            None => {
                let category = Category::new(NewCategory {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                })?;
                created += 1;
                categories.insert(category).await?
            }
        };

        if products.count_by_category(category.id).await? > 0 {
            continue;
        }

        for sample in samples.iter() {
            let product = Product::new(
                NewProduct {
                    name: sample.name.to_string(),
                    description: sample.description.to_string(),
                    price: Decimal::new(sample.cents, 2),
                    stock: sample.stock,
                    category_id: category.id.to_string(),
                    is_active: true,
                    image_url: None,
                    tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
                },
                category.id,
            )?;
            products.insert(product).await?;
            created += 1;
        }
    }

    if created > 0 {
        tracing::info!(created, "Sample catalog seeded");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCategoryRepository, MockProductRepository, MockUserRepository};
    use crate::service::test_support::{sample_user, TestUnitOfWork};

    fn config() -> AdminSeedConfig {
        AdminSeedConfig {
            email: " admin@example.com ".to_string(),
            username: "admin".to_string(),
            password: "admin-password".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_creates_admin() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| user.is_admin && user.is_active && user.email == "admin@example.com")
            .times(1)
            .returning(Ok);

        let uow = Arc::new(TestUnitOfWork::default().with_users(users));
        assert!(seed_admin(uow, &config()).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(sample_user(email, "admin"))));
        users.expect_insert().never();

        let uow = Arc::new(TestUnitOfWork::default().with_users(users));
        assert!(!seed_admin(uow, &config()).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_catalog_fills_empty_store() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_name().returning(|_| Ok(None));
        categories.expect_insert().times(5).returning(Ok);

        let mut products = MockProductRepository::new();
        products.expect_count_by_category().returning(|_| Ok(0));
        products
            .expect_insert()
            .withf(|product| product.is_active && product.price.scale() == 2)
            .times(7)
            .returning(Ok);

        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_categories(categories)
                .with_products(products),
        );
        assert_eq!(seed_catalog(uow).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seed_catalog_skips_populated_categories() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_name().returning(|name| {
            Ok(Some(
                Category::new(NewCategory {
                    name: name.to_string(),
                    description: None,
                })
                .unwrap(),
            ))
        });
        categories.expect_insert().never();

        let mut products = MockProductRepository::new();
        products.expect_count_by_category().returning(|_| Ok(3));
        products.expect_insert().never();

        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_categories(categories)
                .with_products(products),
        );
        assert_eq!(seed_catalog(uow).await.unwrap(), 0);
    }
}
