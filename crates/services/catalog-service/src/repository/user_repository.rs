//! User repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{Page, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a fully built user
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Overwrite an existing user; `NotFound` if the row is gone
    async fn update(&self, user: User) -> AppResult<User>;

    /// Users in registration order
    async fn list(&self, page: Page) -> AppResult<Vec<User>>;
}

/// Postgres implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(user).insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        match ActiveModel::from(user).update(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("User")),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, page: Page) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
