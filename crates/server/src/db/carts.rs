//! Cart repository for database operations.
//!
//! The cart is the unit of consistency for item mutations. Two invariants
//! are enforced in the schema rather than in application code:
//!
//! - the unique index on `carts.user_id` makes lazy creation race-safe:
//!   concurrent first accesses collapse onto a single row;
//! - the `(cart_id, product_id)` primary key on `cart_items` makes adds
//!   merge-by-key: the upsert increments the existing line's quantity
//!   instead of reading, modifying, and writing the whole item list.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tangelo_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};
use crate::models::product::Product;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A cart line joined against the product it references. The `p_*` columns
/// are NULL when the product has been deleted.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    quantity: i64,
    p_id: Option<ProductId>,
    p_name: Option<String>,
    p_description: Option<String>,
    p_price: Option<f64>,
    p_category: Option<String>,
    p_stock: Option<i64>,
    p_image_url: Option<String>,
    p_created_at: Option<DateTime<Utc>>,
    p_updated_at: Option<DateTime<Utc>>,
}

impl CartLineRow {
    fn into_line(self) -> Result<CartLine, RepositoryError> {
        let product = match self.p_id {
            Some(id) => {
                let (
                    Some(name),
                    Some(description),
                    Some(price),
                    Some(category),
                    Some(stock),
                    Some(created_at),
                    Some(updated_at),
                ) = (
                    self.p_name,
                    self.p_description,
                    self.p_price,
                    self.p_category,
                    self.p_stock,
                    self.p_created_at,
                    self.p_updated_at,
                )
                else {
                    return Err(RepositoryError::DataCorruption(
                        "cart line joined a partial product row".to_owned(),
                    ));
                };

                Some(Product {
                    id,
                    name,
                    description,
                    price,
                    category,
                    stock,
                    image_url: self.p_image_url,
                    created_at,
                    updated_at,
                })
            }
            None => None,
        };

        Ok(CartLine {
            product_id: self.product_id,
            quantity: self.quantity,
            product,
        })
    }
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating an empty one if none exists yet.
    ///
    /// Idempotent under concurrent first access: the losing insert hits the
    /// unique `user_id` index and falls through to fetching the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        self.ensure(user_id).await?;
        self.read(user_id).await
    }

    /// Add `quantity` of a product to the user's cart, merging by product.
    ///
    /// The increment happens inside the database, so two concurrent adds for
    /// the same product both land.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, RepositoryError> {
        let cart_id = self.ensure(user_id).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity, added_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.touch(cart_id, now).await?;
        self.read(user_id).await
    }

    /// Remove a product's line from the user's cart.
    ///
    /// A no-op (not an error) when the product isn't in the cart; the cart
    /// itself is lazily created if missing, consistent with
    /// [`Self::get_or_create`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, RepositoryError> {
        let cart_id = self.ensure(user_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1 AND product_id = ?2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        self.touch(cart_id, Utc::now()).await?;
        self.read(user_id).await
    }

    /// Remove every line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart_id = self.ensure(user_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        self.touch(cart_id, Utc::now()).await?;
        self.read(user_id).await
    }

    /// Make sure a cart row exists for the user and return its ID.
    async fn ensure(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO carts (id, user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(CartId::new())
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        let (id,): (CartId,) = sqlx::query_as("SELECT id FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(id)
    }

    /// Bump the cart's `updated_at` after an item mutation.
    async fn touch(&self, cart_id: CartId, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Read the user's cart with its lines expanded against the catalog.
    async fn read(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM carts
            WHERE user_id = ?1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let lines = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.product_id, ci.quantity,
                   p.id          AS p_id,
                   p.name        AS p_name,
                   p.description AS p_description,
                   p.price       AS p_price,
                   p.category    AS p_category,
                   p.stock       AS p_stock,
                   p.image_url   AS p_image_url,
                   p.created_at  AS p_created_at,
                   p.updated_at  AS p_updated_at
            FROM cart_items ci
            LEFT JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = ?1
            ORDER BY ci.rowid
            ",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        let items = lines
            .into_iter()
            .map(CartLineRow::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cart {
            id: row.id,
            user_id: row.user_id,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing;
    use crate::db::{ProductRepository, UserRepository};
    use crate::models::product::NewProduct;
    use tangelo_core::{Role, Username};

    async fn create_user(pool: &SqlitePool, name: &str) -> UserId {
        let username = Username::parse(name).unwrap();
        UserRepository::new(pool)
            .create(&username, "hash", &[Role::User])
            .await
            .unwrap()
            .id
    }

    async fn create_product(pool: &SqlitePool, name: &str) -> ProductId {
        ProductRepository::new(pool)
            .create(&NewProduct {
                name: name.to_owned(),
                description: "A test product".to_owned(),
                price: 10.0,
                category: "test".to_owned(),
                stock: 5,
                image_url: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn cart_count(pool: &SqlitePool, user_id: UserId) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_first_access_creates_empty_cart() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;

        let cart = CartRepository::new(&pool).get_or_create(user_id).await.unwrap();
        assert_eq!(cart.user_id, user_id);
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let repo = CartRepository::new(&pool);

        let first = repo.get_or_create(user_id).await.unwrap();
        let second = repo.get_or_create(user_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(cart_count(&pool, user_id).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_yields_single_cart() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let repo = CartRepository::new(&pool);

        let (a, b) = tokio::join!(repo.get_or_create(user_id), repo.get_or_create(user_id));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(cart_count(&pool, user_id).await, 1);
    }

    #[tokio::test]
    async fn test_add_same_product_merges_quantity() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;
        let repo = CartRepository::new(&pool);

        repo.add_item(user_id, product_id, 2).await.unwrap();
        let cart = repo.add_item(user_id, product_id, 3).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        let line = cart.items.first().unwrap();
        assert_eq!(line.product_id, product_id);
        assert_eq!(line.quantity, 5);
    }

    #[tokio::test]
    async fn test_add_expands_product_for_display() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;

        let cart = CartRepository::new(&pool)
            .add_item(user_id, product_id, 1)
            .await
            .unwrap();

        let product = cart.items.first().unwrap().product.as_ref().unwrap();
        assert_eq!(product.name, "Widget");
    }

    #[tokio::test]
    async fn test_items_keep_insertion_order() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let first = create_product(&pool, "First").await;
        let second = create_product(&pool, "Second").await;
        let repo = CartRepository::new(&pool);

        repo.add_item(user_id, first, 1).await.unwrap();
        let cart = repo.add_item(user_id, second, 1).await.unwrap();

        let order: Vec<ProductId> = cart.items.iter().map(|l| l.product_id).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[tokio::test]
    async fn test_remove_absent_product_is_noop() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;
        let other = create_product(&pool, "Gadget").await;
        let repo = CartRepository::new(&pool);

        repo.add_item(user_id, product_id, 2).await.unwrap();
        let cart = repo.remove_item(user_id, other).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_on_missing_cart_creates_empty_cart() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;

        let cart = CartRepository::new(&pool)
            .remove_item(user_id, product_id)
            .await
            .unwrap();

        assert!(cart.items.is_empty());
        assert_eq!(cart_count(&pool, user_id).await, 1);
    }

    #[tokio::test]
    async fn test_clear_always_empties() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;
        let repo = CartRepository::new(&pool);

        repo.add_item(user_id, product_id, 4).await.unwrap();
        let cart = repo.clear(user_id).await.unwrap();
        assert!(cart.items.is_empty());

        // Clearing an already-empty cart stays empty.
        let cart = repo.clear(user_id).await.unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_resolves_to_null() {
        let (pool, _dir) = testing::pool().await;
        let user_id = create_user(&pool, "alice").await;
        let product_id = create_product(&pool, "Widget").await;
        let repo = CartRepository::new(&pool);

        repo.add_item(user_id, product_id, 1).await.unwrap();
        assert!(ProductRepository::new(&pool).delete(product_id).await.unwrap());

        let cart = repo.get_or_create(user_id).await.unwrap();
        let line = cart.items.first().unwrap();
        assert_eq!(line.product_id, product_id);
        assert!(line.product.is_none());
    }
}
