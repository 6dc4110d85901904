//! Product service - CRUD, filtering and search.
//!
//! Every write that names a category resolves it first; a reference that
//! does not resolve fails with `NotFound("Category")` before anything is
//! written.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{NewProduct, Page, Product, ProductFilter, ProductPatch};

use super::parse_id;
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create(&self, input: NewProduct) -> AppResult<Product>;

    async fn get(&self, id: &str) -> AppResult<Product>;

    /// Products matching every filter, newest first
    async fn list(&self, filter: ProductFilter, page: Page) -> AppResult<Vec<Product>>;

    /// Name or description containing `term` (case-insensitive), or a tag
    /// equal to `term`; newest first
    async fn search(&self, term: &str, page: Page) -> AppResult<Vec<Product>>;

    async fn update(&self, id: &str, patch: ProductPatch) -> AppResult<Product>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct ProductManager {
    uow: Arc<dyn UnitOfWork>,
}

impl ProductManager {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    async fn resolve_category(&self, raw: &str) -> AppResult<Uuid> {
        let id = parse_id(raw, "Category")?;
        let category = self
            .uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")?;
        Ok(category.id)
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn create(&self, input: NewProduct) -> AppResult<Product> {
        input.validate()?;
        let category_id = self.resolve_category(&input.category_id).await?;

        let product = Product::new(input, category_id)?;
        let product = self.uow.products().insert(product).await?;

        tracing::info!(product_id = %product.id, category_id = %category_id, "Product created");
        Ok(product)
    }

    async fn get(&self, id: &str) -> AppResult<Product> {
        let id = parse_id(id, "Product")?;
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn list(&self, filter: ProductFilter, page: Page) -> AppResult<Vec<Product>> {
        self.uow.products().list(&filter, page).await
    }

    async fn search(&self, term: &str, page: Page) -> AppResult<Vec<Product>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::validation("Search term is required"));
        }
        self.uow.products().search(term, page).await
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> AppResult<Product> {
        let id = parse_id(id, "Product")?;
        patch.validate()?;
        let products = self.uow.products();

        let mut product = products
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")?;

        let category_id = match patch.category_id.as_deref() {
            Some(raw) => Some(self.resolve_category(raw).await?),
            None => None,
        };

        product.apply(patch, category_id);
        products.update(product).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "Product")?;
        if !self.uow.products().delete(id).await? {
            return Err(AppError::not_found("Product"));
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCategoryRepository, MockProductRepository};
    use crate::service::test_support::TestUnitOfWork;
    use domain::{Category, NewCategory};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn tools() -> Category {
        Category::new(NewCategory {
            name: "Tools".to_string(),
            description: None,
        })
        .unwrap()
    }

    fn hammer(category_id: &str) -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            description: "Claw hammer".to_string(),
            price: Decimal::new(1999, 2),
            stock: 10,
            category_id: category_id.to_string(),
            is_active: true,
            image_url: None,
            tags: vec!["hand-tools".to_string()],
        }
    }

    fn service(categories: MockCategoryRepository, products: MockProductRepository) -> ProductManager {
        let uow = TestUnitOfWork::default()
            .with_categories(categories)
            .with_products(products);
        ProductManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_create_with_missing_category_inserts_nothing() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_insert().never();

        let err = service(categories, products)
            .create(hammer(&Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(what) if what == "Category"));
    }

    #[tokio::test]
    async fn test_create_with_malformed_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().never();
        let mut products = MockProductRepository::new();
        products.expect_insert().never();

        let err = service(categories, products)
            .create(hammer("tools"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_success() {
        let category = tools();
        let category_id = category.id;
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .with(eq(category_id))
            .returning(move |_| Ok(Some(category.clone())));
        let mut products = MockProductRepository::new();
        products
            .expect_insert()
            .withf(move |p| p.category_id == category_id && p.name == "Hammer")
            .returning(Ok);

        let product = service(categories, products)
            .create(hammer(&category_id.to_string()))
            .await
            .unwrap();
        assert_eq!(product.price, Decimal::new(1999, 2));
    }

    #[tokio::test]
    async fn test_create_negative_price_rejected() {
        let mut input = hammer(&Uuid::new_v4().to_string());
        input.price = Decimal::new(-1, 0);

        let err = service(MockCategoryRepository::new(), MockProductRepository::new())
            .create(input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_revalidates_category() {
        let category_id = Uuid::new_v4();
        let existing = Product::new(hammer(&category_id.to_string()), category_id).unwrap();
        let product_id = existing.id;

        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        products.expect_update().never();

        let patch = ProductPatch {
            category_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        let err = service(categories, products)
            .update(&product_id.to_string(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(what) if what == "Category"));
    }

    #[tokio::test]
    async fn test_update_without_category_skips_lookup() {
        let category_id = Uuid::new_v4();
        let existing = Product::new(hammer(&category_id.to_string()), category_id).unwrap();
        let product_id = existing.id;

        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().never();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        products.expect_update().returning(Ok);

        let patch = ProductPatch {
            stock: Some(0),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = service(categories, products)
            .update(&product_id.to_string(), patch)
            .await
            .unwrap();
        assert_eq!(updated.stock, 0);
        assert!(!updated.is_active);
        assert_eq!(updated.category_id, category_id);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let id = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        let mut seq = mockall::Sequence::new();
        products
            .expect_delete()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        products
            .expect_delete()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let service = service(MockCategoryRepository::new(), products);
        assert!(service.delete(&id.to_string()).await.is_ok());
        assert!(matches!(
            service.delete(&id.to_string()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_search_rejected() {
        let mut products = MockProductRepository::new();
        products.expect_search().never();

        let err = service(MockCategoryRepository::new(), products)
            .search("   ", Page::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_trims_term() {
        let mut products = MockProductRepository::new();
        products
            .expect_search()
            .with(eq("hammer"), eq(Page::default()))
            .returning(|_, _| Ok(vec![]));

        let found = service(MockCategoryRepository::new(), products)
            .search("  hammer ", Page::default())
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
