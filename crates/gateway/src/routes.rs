//! Route configuration.

use std::time::Duration;

use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_routes, category_routes, health_routes, product_routes, user_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Prefix of every resource route
pub const API_PREFIX: &str = "/api/v1";

/// Create the main router with all routes.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes(state.clone()))
        .nest("/categories", category_routes(state.clone()))
        .nest("/products", product_routes(state.clone()));

    Router::new()
        // Health check (no auth)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_PREFIX, api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
