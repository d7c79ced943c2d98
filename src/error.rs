use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storefront_user::UserError;
use thiserror::Error;

use crate::auth::TokenError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    TokenError(#[from] TokenError),

    #[error(transparent)]
    UserError(#[from] UserError),

    #[error("Internal server error")]
    InternalError(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::TokenError(TokenError::Signing(e)) => {
                tracing::error!("Token signing error: {}", e);
                internal()
            }
            AppError::TokenError(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::UserError(UserError::ValidationError(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::UserError(e @ UserError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, e.to_string())
            }
            AppError::UserError(e @ UserError::EmailAlreadyExists) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            AppError::UserError(UserError::HashingError(e)) => {
                tracing::error!("Password hashing error: {}", e);
                internal()
            }
            AppError::UserError(UserError::DatabaseError(e)) => {
                tracing::error!("Database error: {:?}", e);
                internal()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal()
            }
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again later.".to_owned(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        (status, Json(json!({ "error": message }))).into_response()
    }
}
