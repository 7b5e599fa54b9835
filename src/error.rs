//! Application error type and its JSON responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::users::DirectoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Requested resource is forbidden")]
    Forbidden,

    #[error("directory error: {0}")]
    Directory(DirectoryError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Directory(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateEmail => AppError::Conflict("Email already exists".into()),
            other => AppError::Directory(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match &self {
            AppError::Validation(msg) => ("validation_error", Some(msg.clone())),
            AppError::InvalidRequest(msg) => ("invalid_request", Some(msg.clone())),
            AppError::Conflict(msg) => ("conflict", Some(msg.clone())),
            AppError::AuthenticationFailed => ("authentication_failed", Some(self.to_string())),
            AppError::Forbidden => ("Requested resource is forbidden", None),
            AppError::Directory(err) => {
                tracing::error!(error = %err, "directory error");
                ("directory_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                ("internal_error", None)
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
