//! Authentication service - registration, credential checks and login.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use common::{AppError, AppResult};
use domain::{user::normalize_email, user::validate_username, Password, User};

use super::token_service::{IssuedToken, TokenService};
use crate::infra::UnitOfWork;

/// Digest verified when the email is unknown, so a miss costs the same as a
/// wrong password.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("dummy-password-for-timing").ok());

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an active, non-admin account.
    ///
    /// Email is checked before username; the first collision wins.
    async fn register(&self, email: String, username: String, password: String)
        -> AppResult<User>;

    /// Check credentials. Unknown email and wrong password are the same
    /// `InvalidCredentials` outcome.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    /// Authenticate and issue a bearer token.
    async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken>;
}

pub struct Authenticator {
    uow: Arc<dyn UnitOfWork>,
    tokens: Arc<dyn TokenService>,
}

impl Authenticator {
    pub fn new(uow: Arc<dyn UnitOfWork>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        email: String,
        username: String,
        password: String,
    ) -> AppResult<User> {
        let email = normalize_email(&email)?;
        let username = validate_username(&username)?;
        let users = self.uow.users();

        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }
        if users.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        let password = Password::new(&password)?;
        let user = users.insert(User::new(email, username, password)).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email.trim()).await?;

        let password_valid = match &user {
            Some(user) => user.password().verify(password),
            None => {
                if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                    dummy.verify(password);
                }
                false
            }
        };

        match user {
            Some(user) if password_valid => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let user = self.authenticate(email, password).await?;
        let issued = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(issued)
    }
}
