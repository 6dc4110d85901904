//! Category repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use common::{AppError, AppResult};
use domain::{Category, Page};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Exact, case-sensitive name lookup
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    async fn insert(&self, category: Category) -> AppResult<Category>;

    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Categories sorted by name ascending
    async fn list(&self, page: Page) -> AppResult<Vec<Category>>;
}

/// Postgres implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(result.map(Category::from))
    }

    async fn insert(&self, category: Category) -> AppResult<Category> {
        let model = ActiveModel::from(category).insert(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        match ActiveModel::from(category).update(&self.db).await {
            Ok(model) => Ok(Category::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Category")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // The products foreign key restricts deletes that raced a product insert.
        let result = CategoryEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::has_dependents("Category")
                }
                _ => AppError::from(e),
            })?;

        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: Page) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }
}
