//! Product repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use tangelo_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, stock, image_url,
                   created_at, updated_at
            FROM products
            ORDER BY rowid
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, stock, image_url,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, data: &NewProduct) -> Result<Product, RepositoryError> {
        let id = ProductId::new();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO products (id, name, description, price, category, stock,
                                  image_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(&data.category)
        .bind(data.stock)
        .bind(&data.image_url)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(Product {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            price: data.price,
            category: data.category.clone(),
            stock: data.stock,
            image_url: data.image_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge the supplied fields into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if a renamed product collides with
    /// an existing name.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE products
            SET name        = COALESCE(?1, name),
                description = COALESCE(?2, description),
                price       = COALESCE(?3, price),
                category    = COALESCE(?4, category),
                stock       = COALESCE(?5, stock),
                image_url   = COALESCE(?6, image_url),
                updated_at  = ?7
            WHERE id = ?8
            ",
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(&patch.category)
        .bind(patch.stock)
        .bind(&patch.image_url)
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by its ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    /// Cart lines referencing the product are left in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn sample(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: "A test product".to_owned(),
            price: 100.0,
            category: "Test Category".to_owned(),
            stock: 10,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_is_structurally_equal() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample("Widget")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        assert!(repo.get(ProductId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&sample("Widget")).await.unwrap();
        let err = repo
            .create(&sample("Widget"))
            .await
            .expect_err("duplicate name should conflict");
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&sample("First")).await.unwrap();
        repo.create(&sample("Second")).await.unwrap();
        repo.create(&sample("Third")).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_update_merges_only_supplied_fields() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample("Widget")).await.unwrap();

        let patch = ProductPatch {
            price: Some(75.5),
            stock: Some(3),
            ..Default::default()
        };
        let updated = repo.update(created.id, &patch).await.unwrap();

        assert_eq!(updated.price, 75.5);
        assert_eq!(updated.stock, 3);
        // Untouched fields keep their values.
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.description, "A test product");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        let err = repo
            .update(ProductId::new(), &ProductPatch::default())
            .await
            .expect_err("unknown id");
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&sample("Widget")).await.unwrap();
        let other = repo.create(&sample("Gadget")).await.unwrap();

        let patch = ProductPatch {
            name: Some("Widget".to_owned()),
            ..Default::default()
        };
        let err = repo
            .update(other.id, &patch)
            .await
            .expect_err("rename collision");
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let (pool, _dir) = testing::pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample("Widget")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }
}
