//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] tangelo_core::UsernameError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Username already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No account with that username.
    #[error("user not found")]
    UserNotFound,

    /// Password hash comparison failed.
    #[error("invalid password")]
    InvalidPassword,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuance error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
