//! Role-based access policy.
//!
//! A pure predicate over the verified credential; the transport layer is
//! responsible for translating a denial into an HTTP response.

use thiserror::Error;

use tangelo_core::{Credential, Role};

/// A denied access check: the credential lacks the required role.
#[derive(Debug, Error)]
#[error("missing required role: {required}")]
pub struct Denied {
    /// The role the caller would need.
    pub required: Role,
}

impl Denied {
    /// The client-facing message for this denial.
    #[must_use]
    pub fn message(&self) -> String {
        match self.required {
            Role::Admin => "Admin role required".to_owned(),
            Role::User => "User role required".to_owned(),
        }
    }
}

/// Check that the credential carries the given role.
///
/// # Errors
///
/// Returns [`Denied`] when the role is absent.
pub fn require_role(credential: &Credential, role: Role) -> Result<(), Denied> {
    if credential.has_role(role) {
        Ok(())
    } else {
        Err(Denied { required: role })
    }
}
