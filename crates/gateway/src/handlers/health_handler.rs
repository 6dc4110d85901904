//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    pub storage: ServiceHealth,
}

/// Dependency health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Report whether storage answers a ping
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let storage = match state.storage.ping().await {
        Ok(()) => ServiceHealth {
            status: "healthy".to_string(),
            error: None,
        },
        Err(e) => ServiceHealth {
            status: "unhealthy".to_string(),
            error: Some(e.user_message()),
        },
    };

    let healthy = storage.error.is_none();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        storage,
    };

    if healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
