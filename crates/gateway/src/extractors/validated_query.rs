//! Validated query-string extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

use super::first_message;

/// Query parameters that deserialized and passed their `Validate` rules.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedQuery(value))
    }
}
