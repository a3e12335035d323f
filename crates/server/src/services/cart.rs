//! Cart service.
//!
//! Thin business layer over the cart repository: quantity validation here,
//! merge and idempotence invariants in the store.

use sqlx::SqlitePool;
use thiserror::Error;

use tangelo_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::models::cart::Cart;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Get the user's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(self.carts.get_or_create(user_id).await?)
    }

    /// Add a quantity of a product to the user's cart, merging by product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` unless `quantity > 0`.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }

        Ok(self.carts.add_item(user_id, product_id, quantity).await?)
    }

    /// Remove a product from the user's cart (no-op if absent).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        Ok(self.carts.remove_item(user_id, product_id).await?)
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn clear(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(self.carts.clear(user_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{UserRepository, testing};
    use tangelo_core::{Role, Username};

    async fn create_user(pool: &SqlitePool) -> UserId {
        let username = Username::parse("alice").unwrap();
        UserRepository::new(pool)
            .create(&username, "hash", &[Role::User])
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool).await;
        let service = CartService::new(&pool);

        let err = service
            .add_item(user_id, ProductId::new(), 0)
            .await
            .expect_err("zero quantity");
        assert!(matches!(err, CartError::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool).await;
        let service = CartService::new(&pool);

        let err = service
            .add_item(user_id, ProductId::new(), -3)
            .await
            .expect_err("negative quantity");
        assert!(matches!(err, CartError::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_rejected_add_leaves_cart_untouched() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool).await;
        let service = CartService::new(&pool);

        let _ = service.add_item(user_id, ProductId::new(), 0).await;
        let cart = service.get_or_create(user_id).await.unwrap();
        assert!(cart.items.is_empty());
    }
}
