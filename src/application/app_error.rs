use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No credential supplied")]
    Unauthenticated,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Credential expired")]
    CredentialExpired,

    #[error("Credential is not authorized for this project")]
    ScopeMismatch,

    #[error("Not found")]
    NotFound,

    #[error("Active API key limit reached for this project")]
    CapacityExceeded,

    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Too many requests. Please slow down.")]
    RateLimited,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request took too long to complete")]
    RequestTimeout,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    Unauthenticated,
    InvalidCredential,
    CredentialExpired,
    ScopeMismatch,
    NotFound,
    CapacityExceeded,
    GenerationFailed,
    MalformedInput,
    InvalidInput,
    RateLimited,
    Cancelled,
    RequestTimeout,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::InvalidCredential => "INVALID_CREDENTIAL",
            ErrorCode::CredentialExpired => "CREDENTIAL_EXPIRED",
            ErrorCode::ScopeMismatch => "SCOPE_MISMATCH",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::CapacityExceeded => "CAPACITY_EXCEEDED",
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthenticated => ErrorCode::Unauthenticated,
            AppError::InvalidCredential => ErrorCode::InvalidCredential,
            AppError::CredentialExpired => ErrorCode::CredentialExpired,
            AppError::ScopeMismatch => ErrorCode::ScopeMismatch,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::CapacityExceeded => ErrorCode::CapacityExceeded,
            AppError::GenerationFailed(_) => ErrorCode::GenerationFailed,
            AppError::MalformedInput(_) => ErrorCode::MalformedInput,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::RateLimited => ErrorCode::RateLimited,
            AppError::Cancelled => ErrorCode::Cancelled,
            AppError::RequestTimeout => ErrorCode::RequestTimeout,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
