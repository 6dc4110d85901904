//! Product repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::{AppError, AppResult};
use domain::{Page, Product, ProductFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
///
/// Every listing is ordered by creation time, newest first.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn insert(&self, product: Product) -> AppResult<Product>;

    async fn update(&self, product: Product) -> AppResult<Product>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn list(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>>;

    /// Case-insensitive name/description substring, or exact tag
    async fn search(&self, term: &str, page: Page) -> AppResult<Vec<Product>>;

    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64>;
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A foreign key failure on write means the category vanished after the
/// service checked it.
fn map_write_err(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::not_found("Product"),
        other => match other.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::not_found("Category"),
            _ => AppError::from(other),
        },
    }
}

/// Postgres implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn insert(&self, product: Product) -> AppResult<Product> {
        let model = ActiveModel::from(product)
            .insert(&self.db)
            .await
            .map_err(map_write_err)?;
        Ok(Product::from(model))
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let model = ActiveModel::from(product)
            .update(&self.db)
            .await
            .map_err(map_write_err)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>> {
        let mut query = ProductEntity::find();

        if filter.active_only {
            query = query.filter(product::Column::IsActive.eq(true));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(product::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(product::Column::Price.lte(max));
        }

        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn search(&self, term: &str, page: Page) -> AppResult<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

        let condition = Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
            .add(
                Expr::expr(Func::lower(Expr::col(product::Column::Description)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
            .add(Expr::cust_with_values("? = ANY(tags)", [term.to_owned()]));

        let models = ProductEntity::find()
            .filter(condition)
            .order_by_desc(product::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64> {
        let count = ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
