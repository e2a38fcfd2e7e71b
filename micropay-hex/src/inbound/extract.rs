//! Request extractors that answer with the uniform error body.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use micropay_types::AppError;

use super::error::ApiError;

/// `Json<T>` whose rejections are reported as bad requests.
///
/// A missing content type, malformed JSON or a mistyped field all answer
/// `400 {"error","code"}` instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection)),
        }
    }
}

fn rejected(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "rejected request body");
    ApiError(AppError::BadRequest(rejection.body_text()))
}
