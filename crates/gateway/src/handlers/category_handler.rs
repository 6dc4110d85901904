//! Category handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Category, CategoryPatch, NewCategory, Product};

use super::PageQuery;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::middleware::admin_middleware;
use crate::state::AppState;

/// Category creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    #[schema(example = "Tools")]
    pub name: String,
    #[schema(example = "Hand and power tools")]
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Category name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Create category routes. Reads are public, writes need an admin.
pub fn category_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category))
        .route("/:id/products", get(list_category_products));

    let admin = Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware));

    public.merge(admin)
}

/// List categories by name
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Categories",
    params(PageQuery),
    responses(
        (status = 200, description = "Categories sorted by name", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.category_service.list(query.page()).await?))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.category_service.get(&id).await?))
}

/// Products of a category, active or not
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/products",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID"), PageQuery),
    responses(
        (status = 200, description = "Products, newest first", body = Vec<Product>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(
        state.category_service.products(&id, query.page()).await?,
    ))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Categories",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error or name already taken"),
        (status = 401, description = "Could not validate credentials"),
        (status = 403, description = "Not enough permissions")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state
        .category_service
        .create(NewCategory {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation error or name already taken"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let patch = CategoryPatch {
        name: payload.name,
        description: payload.description,
    };
    Ok(Json(state.category_service.update(&id, patch).await?))
}

/// Delete a category no product refers to (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Products still reference the category"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.category_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
