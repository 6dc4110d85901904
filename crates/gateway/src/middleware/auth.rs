//! Authentication middleware.
//!
//! Both layers resolve the bearer token through the catalog authorizer and
//! put the resolved user into request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use catalog_service_lib::service::Gate;
use common::AppError;
use domain::User;

use crate::state::AppState;

/// User resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Require an active account.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(state, request, next, Gate::Active).await
}

/// Require an active admin account.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(state, request, next, Gate::Admin).await
}

async fn authorize(
    state: AppState,
    mut request: Request<Body>,
    next: Next,
    gate: Gate,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers());
    let user = state
        .authorizer
        .resolve(token.as_ref().map(|t| t.token()), gate)
        .await?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Bearer credentials from the Authorization header, if well formed.
fn extract_token(headers: &HeaderMap) -> Option<Bearer> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer)
}
