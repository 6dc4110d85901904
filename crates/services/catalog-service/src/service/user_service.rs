//! User service - profile reads and self-service updates.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Page, User, UserPatch};

use super::parse_id;
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Look up a user by its opaque id
    async fn get(&self, id: &str) -> AppResult<User>;

    async fn list(&self, page: Page) -> AppResult<Vec<User>>;

    /// Apply a profile patch on behalf of the user themselves.
    ///
    /// Changed email/username must not belong to any other user. A new
    /// password is hashed before it reaches storage.
    async fn update_self(&self, user_id: Uuid, patch: UserPatch) -> AppResult<User>;
}

pub struct UserManager {
    uow: Arc<dyn UnitOfWork>,
}

impl UserManager {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get(&self, id: &str) -> AppResult<User> {
        let id = parse_id(id, "User")?;
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn list(&self, page: Page) -> AppResult<Vec<User>> {
        self.uow.users().list(page).await
    }

    async fn update_self(&self, user_id: Uuid, patch: UserPatch) -> AppResult<User> {
        let changes = patch.into_changes()?;
        let users = self.uow.users();

        let mut user = users.find_by_id(user_id).await?.ok_or_not_found("User")?;

        if let Some(email) = changes.email.as_deref() {
            if email != user.email {
                if let Some(existing) = users.find_by_email(email).await? {
                    if existing.id != user.id {
                        return Err(AppError::conflict("Email"));
                    }
                }
            }
        }

        if let Some(username) = changes.username.as_deref() {
            if username != user.username {
                if let Some(existing) = users.find_by_username(username).await? {
                    if existing.id != user.id {
                        return Err(AppError::conflict("Username"));
                    }
                }
            }
        }

        user.apply(changes);
        let user = users.update(user).await?;

        tracing::info!(user_id = %user.id, "User profile updated");
        Ok(user)
    }
}
