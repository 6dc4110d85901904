//! Unified error handling.
//!
//! Every service operation returns an [`AppResult`]. The HTTP boundary turns
//! the error into a status code and a `{"error": {"code", "message"}}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    /// Token missing, malformed, expired, badly signed or naming an unknown
    /// user. Callers never learn which.
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    Inactive,

    #[error("Not enough permissions")]
    Forbidden,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0} still has dependent records")]
    HasDependents(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    #[error("{0} is unavailable")]
    Unavailable(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Inactive => "INACTIVE_USER",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::HasDependents(_) => "HAS_DEPENDENTS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::Inactive
            | AppError::HasDependents(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Unavailable(what) => {
                tracing::error!("{} unavailable", what);
                self.to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the caller may see a 401 challenge header.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::InvalidCredentials)
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let challenge = self.is_authentication_failure();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        if challenge {
            (
                status,
                [(axum::http::header::WWW_AUTHENTICATE, "Bearer")],
                Json(body),
            )
                .into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Connection failures surface as `Unavailable`, unique-index violations as
/// `Conflict`; everything else stays opaque.
#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!("Unique constraint violation: {}", detail);
            return AppError::Conflict("Record".to_string());
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                tracing::error!("Storage connection failed: {:?}", err);
                AppError::Unavailable("Storage".to_string())
            }
            other => AppError::Database(other),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::Conflict(what.into())
    }

    pub fn has_dependents(entity: impl Into<String>) -> Self {
        AppError::HasDependents(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn unavailable(what: impl Into<String>) -> Self {
        AppError::Unavailable(what.into())
    }
}
