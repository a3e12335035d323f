//! Signed bearer token issuing and verification.
//!
//! Tokens are compact HS256-signed strings carrying the caller's identity
//! and roles. Verification is pure: no store lookup happens, so a deleted
//! account's token stays valid until it expires naturally.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tangelo_core::{Credential, Role, UserId};

/// Fixed token lifetime: 24 hours.
pub const TOKEN_TTL_SECONDS: i64 = 86_400;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature check failed or the payload could not be decoded.
    #[error("invalid token")]
    Invalid,

    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The token could not be signed.
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// The signed claims set.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the account ID.
    sub: UserId,
    username: String,
    roles: Vec<Role>,
    /// Issued-at (Unix timestamp, seconds).
    iat: i64,
    /// Expiry (Unix timestamp, seconds).
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
///
/// Built once at startup from the configured signing secret and shared
/// read-only through the application state.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a hard boundary, no grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for the given credential with the standard 24h lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the claims cannot be encoded.
    pub fn issue(&self, credential: &Credential) -> Result<String, TokenError> {
        self.issue_with_ttl(credential, TOKEN_TTL_SECONDS)
    }

    /// Issue a token with an explicit lifetime in seconds.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the claims cannot be encoded.
    pub fn issue_with_ttl(
        &self,
        credential: &Credential,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: credential.user_id,
            username: credential.username.clone(),
            roles: credential.roles.clone(),
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return the credential it carries.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the expiry has passed, or
    /// `TokenError::Invalid` for any other failure (bad signature, wrong
    /// shape, truncation).
    pub fn verify(&self, token: &str) -> Result<Credential, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(Credential {
            user_id: data.claims.sub,
            username: data.claims.username,
            roles: data.claims.roles,
        })
    }
}
