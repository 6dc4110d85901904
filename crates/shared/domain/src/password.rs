//! Password value object.
//!
//! Wraps an Argon2 PHC digest. The plaintext never leaves `new`/`verify`
//! and the digest is redacted from debug output.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// `DomainError::Password` if the plaintext is shorter than
    /// [`MIN_PASSWORD_LENGTH`], `DomainError::Internal` if hashing fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a digest loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Digest for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext against this digest.
    ///
    /// A malformed digest never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}
