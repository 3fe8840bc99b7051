use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated
            | AppError::InvalidCredential
            | AppError::CredentialExpired => StatusCode::UNAUTHORIZED,
            AppError::ScopeMismatch => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::CapacityExceeded => StatusCode::CONFLICT,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedInput(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }

        let message = match &self {
            // details were logged above; keep them out of the body
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
            AppError::GenerationFailed(msg)
            | AppError::MalformedInput(msg)
            | AppError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        };
        error_resp(status, self.code(), message)
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({ "code": code.as_str(), "message": message });
    (status, Json(body)).into_response()
}
