//! Tangelo Core - Shared types library.
//!
//! This crate provides common types used across all Tangelo components:
//! - `server` - The REST API binary
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, roles, and
//!   the decoded token credential

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
