//! The closed set of account roles.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0}")]
pub struct RoleError(String);

/// An account role.
///
/// Roles are a closed enum rather than free-form strings so that a typo in
/// an authorization check fails to compile instead of silently granting or
/// denying access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer account. Every account holds this role.
    User,
    /// Administrator account, allowed to manage the catalog and create
    /// other admin accounts.
    Admin,
}

impl Role {
    /// Returns the canonical string form of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().expect("parses"), role);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
        // Case matters: role strings are canonical lowercase.
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).expect("serialize"),
            "\"admin\""
        );
        let roles: Vec<Role> = serde_json::from_str(r#"["user","admin"]"#).expect("deserialize");
        assert_eq!(roles, vec![Role::User, Role::Admin]);
    }
}
