//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{UserPatch, UserResponse};

use super::PageQuery;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::middleware::{admin_middleware, auth_middleware, CurrentUser};
use crate::state::AppState;

/// Self-service profile update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            username: request.username,
            password: request.password,
        }
    }
}

/// Create user routes. `/me` needs an active account, the rest an admin.
pub fn user_routes(state: AppState) -> Router<AppState> {
    let own = Router::new()
        .route("/me", get(get_current_user).put(update_current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware));

    own.merge(admin)
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 400, description = "Inactive user"),
        (status = 401, description = "Could not validate credentials")
    )
)]
pub async fn get_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error, inactive user, or email/username taken"),
        (status = 401, description = "Could not validate credentials")
    )
)]
pub async fn update_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = state
        .user_service
        .update_self(user.id, UserPatch::from(payload))
        .await?;
    Ok(Json(UserResponse::from(updated)))
}

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Users in creation order", body = Vec<UserResponse>),
        (status = 401, description = "Could not validate credentials"),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list(query.page()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Could not validate credentials"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(Json(UserResponse::from(user)))
}
