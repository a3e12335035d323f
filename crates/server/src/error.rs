//! Unified error handling for the API surface.
//!
//! Provides a unified `ApiError` type that maps domain errors onto HTTP
//! statuses and JSON bodies. All route handlers return `Result<T, ApiError>`.
//! This is the only place that knows both the error taxonomy and HTTP; it is
//! also where unexpected errors get logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::policy::Denied;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::catalog::CatalogError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation. This API reports these as 400, not 409.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// No token was provided on a protected route.
    #[error("no token provided")]
    NoToken,

    /// Token or password verification failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks a required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The JSON error body: `{"status": ..., "message": ...}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NoToken | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Unexpected errors get logged here; domain services stay silent.
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = self.status_code();

        // Don't expose internal error details to clients
        let message = match self {
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::NoToken => "No token provided".to_owned(),
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg,
        };

        let body = ErrorBody {
            status: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidUsername(err) => Self::Validation(err.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::UserAlreadyExists => Self::Conflict("User already exists".to_owned()),
            AuthError::UserNotFound => Self::NotFound("User not found".to_owned()),
            AuthError::InvalidPassword => Self::Unauthorized("Invalid password".to_owned()),
            AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound => Self::NotFound("Product not found".to_owned()),
            CatalogError::NameTaken => Self::Conflict("Product name already exists".to_owned()),
            CatalogError::EmptyName => Self::Validation("Product name cannot be empty".to_owned()),
            CatalogError::NegativePrice => Self::Validation("Price cannot be negative".to_owned()),
            CatalogError::NegativeStock => Self::Validation("Stock cannot be negative".to_owned()),
            CatalogError::Repository(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::InvalidQuantity => {
                Self::Validation("Quantity must be a positive integer".to_owned())
            }
            CartError::Repository(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<Denied> for ApiError {
    fn from(denied: Denied) -> Self {
        Self::Forbidden(denied.message())
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Validation error for a missing required request field.
pub(crate) fn missing_field(name: &str) -> ApiError {
    ApiError::Validation(format!("Missing required field: {name}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    async fn get_body(err: ApiError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(ApiError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Conflict("dup".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::NotFound("missing".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(ApiError::NoToken), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(ApiError::Unauthorized("nope".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Forbidden("nope".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(ApiError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_not_exposed() {
        let body = get_body(ApiError::Internal("connection pool exhausted".to_owned())).await;
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["status"], 500);
    }

    #[tokio::test]
    async fn test_no_token_message() {
        let body = get_body(ApiError::NoToken).await;
        assert_eq!(body["message"], "No token provided");
    }

    #[tokio::test]
    async fn test_auth_error_messages() {
        let body = get_body(AuthError::UserAlreadyExists.into()).await;
        assert_eq!(body["message"], "User already exists");
        assert_eq!(body["status"], 400);

        let body = get_body(AuthError::UserNotFound.into()).await;
        assert_eq!(body["message"], "User not found");
        assert_eq!(body["status"], 404);

        let body = get_body(AuthError::InvalidPassword.into()).await;
        assert_eq!(body["message"], "Invalid password");
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_catalog_error_messages() {
        let body = get_body(CatalogError::NotFound.into()).await;
        assert_eq!(body["message"], "Product not found");
        assert_eq!(body["status"], 404);

        let body = get_body(CatalogError::NameTaken.into()).await;
        assert_eq!(body["message"], "Product name already exists");
        assert_eq!(body["status"], 400);
    }
}
