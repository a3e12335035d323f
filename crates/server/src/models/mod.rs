//! Domain types for accounts, catalog products, and carts.
//!
//! These types represent validated domain objects separate from database
//! row types; repositories convert rows into them.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{User, UserProfile};
