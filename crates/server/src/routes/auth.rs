//! Authentication route handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::user::UserProfile;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Message returned when the credential fields are missing from the body.
const MISSING_CREDENTIALS: &str = "The username and/or password parameter must be a string";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/adm/register", post(register_admin))
        .route("/login", post(login))
}

/// Request body for register and login.
///
/// Fields are optional so that their absence maps to the contract's 400
/// message instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn require(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(ApiError::Validation(MISSING_CREDENTIALS.to_owned())),
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account with the default role.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let (username, password) = body.require()?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.register(username, password).await?;

    Ok((StatusCode::CREATED, Json(user.profile())))
}

/// Register a new admin account. Caller must hold the admin role.
async fn register_admin(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let (username, password) = body.require()?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.register_admin(username, password).await?;

    Ok((StatusCode::CREATED, Json(user.profile())))
}

/// Login and receive a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>> {
    let (username, password) = body.require()?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let token = auth.login(username, password).await?;

    Ok(Json(TokenResponse { token }))
}
