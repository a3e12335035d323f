//! Cart domain types.
//!
//! A cart is the per-user unit of consistency for item mutations: exactly
//! one exists per account, created lazily on first access.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tangelo_core::{CartId, ProductId, UserId};

use super::product::Product;

/// A user's cart with its lines expanded for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning account; unique per cart.
    pub user_id: UserId,
    /// Cart lines in insertion order, at most one per product.
    pub items: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One cart line: a product reference and a quantity.
///
/// `product` is a read-side expansion of `product_id`; it is `None` when
/// the referenced product has since been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always positive.
    pub quantity: i64,
    pub product: Option<Product>,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}
