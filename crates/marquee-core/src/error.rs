use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::tokens::TokenError;
use crate::response::ApiResponse;

/// Standard error type for Marquee handlers.
#[derive(Debug, Error)]
pub enum MarqueeError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl MarqueeError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarqueeError::NotFound(_) => StatusCode::NOT_FOUND,
            MarqueeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MarqueeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MarqueeError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarqueeError::Conflict(_) => StatusCode::CONFLICT,
            MarqueeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarqueeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarqueeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            MarqueeError::NotFound(_) => "NOT_FOUND",
            MarqueeError::BadRequest(_) => "BAD_REQUEST",
            MarqueeError::Unauthorized(_) => "UNAUTHORIZED",
            MarqueeError::Forbidden(_) => "FORBIDDEN",
            MarqueeError::Conflict(_) => "CONFLICT",
            MarqueeError::Validation(_) => "VALIDATION_ERROR",
            MarqueeError::Internal(_) => "INTERNAL_ERROR",
            MarqueeError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Map a unique-constraint violation to `Conflict(message)`; any other
    /// database error passes through unchanged.
    pub fn conflict_on_unique(err: sea_orm::DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                MarqueeError::Conflict(message.to_string())
            }
            _ => MarqueeError::Database(err),
        }
    }
}

impl From<TokenError> for MarqueeError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotFound => MarqueeError::NotFound("Token not found".to_string()),
            TokenError::ExpiredRefreshToken => MarqueeError::Unauthorized(
                "Refresh token expired. Please log in again.".to_string(),
            ),
            TokenError::ExpiryOutOfRange => {
                MarqueeError::Internal("Token expiry out of range".to_string())
            }
            TokenError::Signing(e) => MarqueeError::Internal(format!("Failed to mint token: {}", e)),
            TokenError::Database(e) => MarqueeError::Database(e),
        }
    }
}

/// Error detail for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl axum::response::IntoResponse for MarqueeError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}
