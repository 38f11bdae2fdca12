//! Request-level error taxonomy

use thiserror::Error;
use warp::http::StatusCode;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is empty or malformed
    #[error("{0}")]
    Validation(String),

    /// No session, or the session's user no longer exists
    #[error("Unauthorized")]
    Unauthorized,

    /// Absent or owned by someone else; the two are not distinguished
    #[error("Not found")]
    NotFound,

    #[error("Email or username already exists.")]
    Duplicate,

    /// Same message for unknown email and wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl warp::reject::Reject for AppError {}
