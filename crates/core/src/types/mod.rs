//! Core domain types.
//!
//! # Type Categories
//!
//! - **IDs**: [`UserId`], [`ProductId`], [`CartId`] - type-safe UUID wrappers
//! - **Identity**: [`Username`] - validated account name
//! - **Authorization**: [`Role`], [`Credential`] - the typed token payload
//!   and the closed role set it carries

mod credential;
mod id;
mod role;
mod username;

pub use credential::Credential;
pub use id::{CartId, ProductId, UserId};
pub use role::{Role, RoleError};
pub use username::{Username, UsernameError};
