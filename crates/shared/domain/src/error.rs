//! Domain-level errors.
//!
//! These errors represent business rule violations detected while building
//! or patching entities. They are independent of storage and transport.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Password-related errors
    #[error("{0}")]
    Password(String),

    /// Internal domain error (hashing backend failure)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
