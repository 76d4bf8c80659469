//! JSON extractor with automatic validation using the validator crate.

use async_trait::async_trait;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has already passed its `Validate` rules.
///
/// Malformed JSON becomes `ApiError::InvalidJson`, rule violations become
/// `ApiError::ValidationError` with one message per field.
///
/// # Example
/// ```ignore
/// async fn create(ValidatedJson(candidate): ValidatedJson<ItemCandidate>) -> ApiResult<Item> {
///     // candidate.name is 2..=50 chars and not blank here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
