//! Request authorization.
//!
//! Resolves a bearer token to a user and checks it against one of three
//! gates. The user record is re-read on every call, so deactivating or
//! demoting a user takes effect on their next request even though their
//! token stays cryptographically valid until it expires.

use std::sync::Arc;

use common::{AppError, AppResult};
use domain::User;

use super::token_service::TokenService;
use crate::infra::UnitOfWork;

/// Access levels, each strictly stronger than the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Gate {
    /// Token verifies and names an existing user
    Identified,
    /// Identified and the account is active
    Active,
    /// Active and the account has the admin flag
    Admin,
}

pub struct Authorizer {
    uow: Arc<dyn UnitOfWork>,
    tokens: Arc<dyn TokenService>,
}

impl Authorizer {
    pub fn new(uow: Arc<dyn UnitOfWork>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }

    /// Resolve `token` and enforce `gate`.
    ///
    /// # Errors
    /// - `Unauthorized` for a missing or invalid token, or an unknown subject
    /// - `Inactive` when the gate needs an active account
    /// - `Forbidden` when the gate needs an admin
    /// - storage errors unchanged
    pub async fn resolve(&self, token: Option<&str>, gate: Gate) -> AppResult<User> {
        let token = token.ok_or(AppError::Unauthorized)?;
        let subject = self.tokens.verify(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %subject, "Token subject no longer exists");
                AppError::Unauthorized
            })?;

        if gate >= Gate::Active && !user.is_active {
            tracing::warn!(user_id = %user.id, "Inactive user refused");
            return Err(AppError::Inactive);
        }

        if gate >= Gate::Admin && !user.is_admin {
            tracing::warn!(user_id = %user.id, "Non-admin refused");
            return Err(AppError::Forbidden);
        }

        Ok(user)
    }

    pub async fn identify(&self, token: Option<&str>) -> AppResult<User> {
        self.resolve(token, Gate::Identified).await
    }

    pub async fn require_active(&self, token: Option<&str>) -> AppResult<User> {
        self.resolve(token, Gate::Active).await
    }

    pub async fn require_admin(&self, token: Option<&str>) -> AppResult<User> {
        self.resolve(token, Gate::Admin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use crate::service::test_support::{sample_user, TestUnitOfWork};
    use crate::service::token_service::MockTokenService;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn authorizer(user: Option<User>, subject: Uuid) -> Authorizer {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(move |token| {
            if token == "good" {
                Ok(subject)
            } else {
                Err(AppError::Unauthorized)
            }
        });

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(subject))
            .returning(move |_| Ok(user.clone()));

        let uow = TestUnitOfWork::default().with_users(users);
        Authorizer::new(Arc::new(uow), Arc::new(tokens))
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let auth = authorizer(None, Uuid::new_v4());
        let err = auth.identify(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let auth = authorizer(None, Uuid::new_v4());
        let err = auth.require_admin(Some("bad")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized_not_not_found() {
        let auth = authorizer(None, Uuid::new_v4());
        let err = auth.identify(Some("good")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_inactive_user_passes_identified_only() {
        let mut user = sample_user("a@x.com", "a");
        user.is_active = false;
        user.is_admin = true;
        let auth = authorizer(Some(user.clone()), user.id);

        assert_eq!(auth.identify(Some("good")).await.unwrap().id, user.id);
        assert!(matches!(
            auth.require_active(Some("good")).await,
            Err(AppError::Inactive)
        ));
        assert!(matches!(
            auth.require_admin(Some("good")).await,
            Err(AppError::Inactive)
        ));
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let user = sample_user("a@x.com", "a");
        let auth = authorizer(Some(user.clone()), user.id);

        assert!(auth.require_active(Some("good")).await.is_ok());
        assert!(matches!(
            auth.require_admin(Some("good")).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_admin_passes_every_gate() {
        let mut user = sample_user("root@x.com", "root");
        user.is_admin = true;
        let auth = authorizer(Some(user.clone()), user.id);

        for gate in [Gate::Identified, Gate::Active, Gate::Admin] {
            assert_eq!(auth.resolve(Some("good"), gate).await.unwrap().id, user.id);
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_masked() {
        let subject = Uuid::new_v4();
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(move |_| Ok(subject));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Err(AppError::unavailable("Storage")));

        let uow = TestUnitOfWork::default().with_users(users);
        let auth = Authorizer::new(Arc::new(uow), Arc::new(tokens));

        assert!(matches!(
            auth.identify(Some("any")).await,
            Err(AppError::Unavailable(_))
        ));
    }
}
