//! Request extractors

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::dto::RequestBody;
use crate::utils::errors::AppError;

/// Extracts the body exactly as `axum::Json<T>`, normalizes it and then runs
/// the body's `check`. Malformed JSON becomes a 400 with the parser's message.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + RequestBody,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        payload.normalize();
        payload.check()?;
        Ok(ValidatedJson(payload))
    }
}
