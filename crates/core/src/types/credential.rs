//! The decoded token credential.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::Role;

/// The identity carried by a verified bearer token.
///
/// A `Credential` is derived per request from the signed token; it is never
/// persisted. Verification is stateless, so the roles reflect the account at
/// the time the token was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// ID of the account the token was issued to.
    pub user_id: UserId,
    /// Username at issuance time.
    pub username: String,
    /// Roles at issuance time.
    pub roles: Vec<Role>,
}

impl Credential {
    /// Returns `true` if the credential carries the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` if the credential carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(roles: Vec<Role>) -> Credential {
        Credential {
            user_id: UserId::new(),
            username: "alice".to_owned(),
            roles,
        }
    }

    #[test]
    fn test_has_role() {
        let cred = credential(vec![Role::User]);
        assert!(cred.has_role(Role::User));
        assert!(!cred.has_role(Role::Admin));
    }

    #[test]
    fn test_is_admin() {
        assert!(!credential(vec![Role::User]).is_admin());
        assert!(credential(vec![Role::User, Role::Admin]).is_admin());
    }

    #[test]
    fn test_empty_roles_grant_nothing() {
        let cred = credential(vec![]);
        assert!(!cred.has_role(Role::User));
        assert!(!cred.is_admin());
    }
}
