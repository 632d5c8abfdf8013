use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Error class. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`, `TOKEN_INVALID`,
    /// `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`, `REJECTED`,
    /// `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Symbolic error token, or the raw error text for internal errors.
    #[schema(example = "FISH_NOT_FOUND")]
    pub result: String,
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or query string could not be decoded.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("missing bearer token")]
    TokenMissing,
    #[error("invalid bearer token")]
    TokenInvalid,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("permission denied")]
    PermissionDenied,
    /// A referenced row does not exist. Carries the symbolic token.
    #[error("not found: {0}")]
    NotFound(&'static str),
    /// A business rule or field check failed. Carries the symbolic token.
    #[error("rejected: {0}")]
    Rejected(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    result: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    result: "AUTH.TOKEN_MISSING".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    result: "AUTH.TOKEN_INVALID".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    result: "AUTH.INVALID_CREDENTIALS".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    result: "AUTH.PERMISSION_DENIED".into(),
                },
            ),
            AppError::NotFound(token) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    result: token.into(),
                },
            ),
            AppError::Rejected(token) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "REJECTED",
                    result: token.into(),
                },
            ),
            AppError::Conflict(token) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    result: token.into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        result: detail,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
