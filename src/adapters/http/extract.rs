//! `Path` and `Json` wrappers whose rejections use the API error body.
//!
//! A path segment that does not parse can't name an existing resource, so it
//! is reported as `NotFound`. A body that does not deserialize is `InvalidInput`.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, OptionalFromRequest, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::app_error::AppError;

pub struct ApiPath<T>(pub T);

pub struct ApiJson<T>(pub T);

fn path_error(rejection: PathRejection) -> AppError {
    tracing::debug!(reason = %rejection.body_text(), "Path rejected");
    AppError::NotFound
}

fn json_error(rejection: JsonRejection) -> AppError {
    AppError::InvalidInput(rejection.body_text())
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_error)?;
        Ok(ApiPath(value))
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(json_error)?;
        Ok(ApiJson(value))
    }
}

/// `None` when the request carries no `Content-Type`, as with `Option<Json<T>>`.
impl<S, T> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let value = <Json<T> as OptionalFromRequest<S>>::from_request(req, state)
            .await
            .map_err(json_error)?;
        Ok(value.map(|Json(value)| ApiJson(value)))
    }
}
