use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use super::ApiError;

/// JSON request body whose rejections (bad syntax, wrong types, missing
/// content type) are reported through the regular error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                Err(ApiError::validation(rejection.body_text()))
            }
        }
    }
}
