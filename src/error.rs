use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain error taxonomy; every handler failure is one of these and is
/// mapped to a status code plus a `{"message": ...}` body at the boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authorized, no token")]
    NoToken,

    #[error("Not authorized, token expired")]
    TokenExpired,

    #[error("Not authorized, token failed")]
    TokenInvalid,

    #[error("Not authorized, user not found")]
    UserNotFound,

    #[error("Forbidden. Required role: {}", required.join(" or "))]
    Forbidden { required: Vec<String> },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::NoToken
            | ApiError::TokenExpired
            | ApiError::TokenInvalid
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
