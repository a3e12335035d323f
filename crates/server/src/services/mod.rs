//! Domain services.
//!
//! Services own the business rules and raise typed errors; they never see
//! HTTP types and never log. The route layer maps their errors to responses.

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
