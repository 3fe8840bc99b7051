use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{app_error::AppError, domain::entities::principal::Credential};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Classifies the request's credential without verifying it.
///
/// `Authorization: Bearer` wins over `X-API-Key` when both are present. An
/// `Authorization` header with any other scheme is rejected outright.
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                return Ok(Credential::Bearer(bearer.token().to_string()));
            }
            Err(rejection) if !rejection.is_missing() => {
                tracing::debug!(error = %rejection, "Unusable Authorization header");
                return Err(AppError::InvalidCredential);
            }
            Err(_) => {}
        }

        let Some(value) = parts.headers.get(API_KEY_HEADER) else {
            return Ok(Credential::None);
        };
        match value.to_str().map(str::trim) {
            Ok(key) if !key.is_empty() => Ok(Credential::ApiKey(key.to_string())),
            _ => Err(AppError::InvalidCredential),
        }
    }
}
