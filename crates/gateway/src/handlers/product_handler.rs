//! Product handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{NewProduct, Page, Product, ProductFilter, ProductPatch};

use super::{default_limit, default_skip};
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::middleware::admin_middleware;
use crate::state::AppState;

/// Product list filters. A non-blank `search` switches to text search and
/// the other filters are ignored.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    #[serde(default = "default_skip")]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    pub category_id: Option<String>,
    /// Name/description substring or exact tag
    pub search: Option<String>,
    /// Hide inactive products (default true)
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    #[schema(example = "Claw hammer")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,
    pub category_id: String,
    #[serde(default = "default_active_only")]
    pub is_active: bool,
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id,
            is_active: request.is_active,
            image_url: request.image_url,
            tags: request.tags,
        }
    }
}

/// Partial product update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id,
            is_active: request.is_active,
            image_url: request.image_url,
            tags: request.tags,
        }
    }
}

/// Create product routes. Reads are public, writes need an admin.
pub fn product_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product));

    let admin = Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware));

    public.merge(admin)
}

/// List or search products, newest first
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, description = "Malformed query")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let page = Page::new(query.skip, query.limit);

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(Json(state.product_service.search(term, page).await?));
    }

    let category_id = match query.category_id.as_deref() {
        Some(raw) => match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            // no stored product can reference a malformed id
            Err(_) => return Ok(Json(Vec::new())),
        },
        None => None,
    };

    let filter = ProductFilter {
        min_price: query.min_price,
        max_price: query.max_price,
        category_id,
        active_only: query.active_only,
    };
    Ok(Json(state.product_service.list(filter, page).await?))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.product_service.get(&id).await?))
}

/// Create a product in an existing category (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.product_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Product or category not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    Ok(Json(
        state.product_service.update(&id, payload.into()).await?,
    ))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    security(("bearer_auth" = []), ("oauth2_password" = [])),
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Not enough permissions"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.product_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
