//! Body extractor accepting JSON or an urlencoded form.

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

use super::first_message;

/// Validated body read as a form when the request says
/// `application/x-www-form-urlencoded`, as JSON otherwise.
pub struct ValidatedJsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            value
        };

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedJsonOrForm(value))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}
