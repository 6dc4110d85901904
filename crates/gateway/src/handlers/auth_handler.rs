//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use catalog_service_lib::service::IssuedToken;
use common::AppResult;
use domain::{UserResponse, TOKEN_TYPE_BEARER};

use crate::extractors::{ValidatedJson, ValidatedJsonOrForm};
use crate::state::AppState;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Unique handle
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "jdoe")]
    pub username: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// User login request
///
/// Also accepted as an OAuth2 password form, where the email travels in
/// `username`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Bearer token returned on login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: issued.expires_in,
        }
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error, or email/username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(payload.email, payload.username, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJsonOrForm(payload): ValidatedJsonOrForm<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let issued = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse::from(issued)))
}
