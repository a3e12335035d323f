//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tangelo_core::{Role, UserId, Username};

/// A registered account (domain type).
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Use [`User::profile`] for the public view.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account ID.
    pub id: UserId,
    /// Account username.
    pub username: Username,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Roles held by the account. Always contains at least [`Role::User`].
    pub roles: Vec<Role>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public-safe projection of the account.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Public projection of a [`User`], safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    pub roles: Vec<Role>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User {
            id: UserId::new(),
            username: Username::parse("alice").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            roles: vec![Role::User],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }
}
