//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

use super::first_message;

/// JSON body that deserialized and passed its `Validate` rules.
///
/// Malformed JSON and rule failures are both `AppError::Validation`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}
