//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body extractor that rejects with `ApiError` (400).
///
/// Unlike `axum::Json`, it does not require a `Content-Type` header and
/// reports every decoding failure, including missing fields, as a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.body_text(),
            })
        })?;

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.to_string(),
            })
        })?;

        Ok(Self(value))
    }
}
