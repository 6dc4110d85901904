//! Category service - CRUD with unique names and delete protection.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::{Category, CategoryPatch, NewCategory, Page, Product, ProductFilter};

use super::parse_id;
use crate::infra::UnitOfWork;

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Create a category; the name must not be taken (exact match).
    async fn create(&self, input: NewCategory) -> AppResult<Category>;

    async fn get(&self, id: &str) -> AppResult<Category>;

    /// Categories sorted by name ascending
    async fn list(&self, page: Page) -> AppResult<Vec<Category>>;

    async fn update(&self, id: &str, patch: CategoryPatch) -> AppResult<Category>;

    /// Delete a category no product refers to.
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Products of an existing category, newest first, active or not
    async fn products(&self, id: &str, page: Page) -> AppResult<Vec<Product>>;
}

pub struct CategoryManager {
    uow: Arc<dyn UnitOfWork>,
}

impl CategoryManager {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn create(&self, input: NewCategory) -> AppResult<Category> {
        let category = Category::new(input)?;
        let categories = self.uow.categories();

        if categories.find_by_name(&category.name).await?.is_some() {
            return Err(AppError::conflict("Category name"));
        }

        let category = categories.insert(category).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn get(&self, id: &str) -> AppResult<Category> {
        let id = parse_id(id, "Category")?;
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn list(&self, page: Page) -> AppResult<Vec<Category>> {
        self.uow.categories().list(page).await
    }

    async fn update(&self, id: &str, patch: CategoryPatch) -> AppResult<Category> {
        let id = parse_id(id, "Category")?;
        let patch = patch.validate()?;
        let categories = self.uow.categories();

        let mut category = categories
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")?;

        if let Some(name) = patch.name.as_deref() {
            if name != category.name {
                if let Some(existing) = categories.find_by_name(name).await? {
                    if existing.id != category.id {
                        return Err(AppError::conflict("Category name"));
                    }
                }
            }
        }

        category.apply(patch);
        categories.update(category).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "Category")?;
        let categories = self.uow.categories();

        categories
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")?;

        let dependents = self.uow.products().count_by_category(id).await?;
        if dependents > 0 {
            tracing::warn!(category_id = %id, dependents, "Category delete blocked");
            return Err(AppError::has_dependents("Category"));
        }

        if !categories.delete(id).await? {
            return Err(AppError::not_found("Category"));
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn products(&self, id: &str, page: Page) -> AppResult<Vec<Product>> {
        let category = self.get(id).await?;
        let filter = ProductFilter {
            category_id: Some(category.id),
            ..Default::default()
        };
        self.uow.products().list(&filter, page).await
    }
}
