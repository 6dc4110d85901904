//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MIN_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};
use crate::password::Password;

/// User domain entity
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .field("is_admin", &self.is_admin)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl User {
    /// Create a new active, non-admin user.
    pub fn new(email: String, username: String, password: Password) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash: password.into_string(),
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored digest as a value object.
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.as_str())
    }

    /// Merge validated changes and bump `updated_at`.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(password) = changes.password {
            self.password_hash = password.into_string();
        }
        self.updated_at = Utc::now();
    }
}

/// Self-service profile update as received from the caller.
#[derive(Clone, Default, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl UserPatch {
    /// Validate every present field and hash the password.
    ///
    /// The plaintext is consumed here; only the digest survives.
    pub fn into_changes(self) -> DomainResult<UserChanges> {
        let email = match self.email {
            Some(email) => Some(normalize_email(&email)?),
            None => None,
        };
        let username = match self.username {
            Some(username) => Some(validate_username(&username)?),
            None => None,
        };
        let password = match self.password {
            Some(plain) => Some(Password::new(&plain)?),
            None => None,
        };

        Ok(UserChanges {
            email,
            username,
            password,
        })
    }
}

/// Validated profile changes, ready to merge.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<Password>,
}

/// Trim an email address and check its basic shape.
pub fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(DomainError::validation("Invalid email format")),
    }
}

/// Trim a username and check it is not empty.
pub fn validate_username(username: &str) -> DomainResult<String> {
    let username = username.trim();
    if username.chars().count() < MIN_NAME_LENGTH {
        return Err(DomainError::validation("Username is required"));
    }
    Ok(username.to_string())
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    /// Unique handle
    pub username: String,
    /// Inactive users are refused by every protected operation
    pub is_active: bool,
    /// Administrators may manage the catalog
    pub is_admin: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
