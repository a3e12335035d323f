//! Authentication extractors.
//!
//! Provides extractors for requiring a verified bearer token (and
//! optionally the admin role) in route handlers. The token travels in the
//! `x-access-token` header.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use tangelo_core::{Credential, Role};

use crate::error::ApiError;
use crate::policy;
use crate::state::AppState;

/// Header carrying the bearer token.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Extractor that requires a verified token.
///
/// Rejects with 403 "No token provided" when the header is absent and
/// 401 "Unauthorized" when the token is invalid or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(credential): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", credential.username)
/// }
/// ```
pub struct RequireAuth(pub Credential);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::NoToken)?;

        let credential = state
            .tokens()
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Unauthorized".to_owned()))?;

        Ok(Self(credential))
    }
}

/// Extractor that requires a verified token carrying the admin role.
///
/// Runs the same token checks as [`RequireAuth`], then the role policy;
/// a non-admin caller is rejected with 403 before the request body is
/// touched.
pub struct RequireAdmin(pub Credential);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(credential) = RequireAuth::from_request_parts(parts, state).await?;

        policy::require_role(&credential, Role::Admin)?;

        Ok(Self(credential))
    }
}
