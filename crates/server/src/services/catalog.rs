//! Catalog service.
//!
//! Business rules for product management: field validation and the unique
//! product name, on top of the product repository.

use sqlx::SqlitePool;
use thiserror::Error;

use tangelo_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the requested ID.
    #[error("product not found")]
    NotFound,

    /// Another product already uses the name.
    #[error("product name already exists")]
    NameTaken,

    /// Product name is empty.
    #[error("product name cannot be empty")]
    EmptyName,

    /// Price is negative.
    #[error("price cannot be negative")]
    NegativePrice,

    /// Stock is negative.
    #[error("stock cannot be negative")]
    NegativeStock,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(_) => Self::NameTaken,
            other => Self::Repository(other),
        }
    }
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// List all products in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.get(id).await?.ok_or(CatalogError::NotFound)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyName`, `CatalogError::NegativePrice` or
    /// `CatalogError::NegativeStock` on invalid fields, and
    /// `CatalogError::NameTaken` if the name is already in use.
    pub async fn create(&self, data: NewProduct) -> Result<Product, CatalogError> {
        if data.name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if data.price < 0.0 {
            return Err(CatalogError::NegativePrice);
        }
        if data.stock < 0 {
            return Err(CatalogError::NegativeStock);
        }

        Ok(self.products.create(&data).await?)
    }

    /// Merge the supplied fields into an existing product.
    ///
    /// # Errors
    ///
    /// Same validation failures as [`Self::create`] for the supplied fields,
    /// plus `CatalogError::NotFound` if the ID is absent.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        if patch.name.as_deref() == Some("") {
            return Err(CatalogError::EmptyName);
        }
        if patch.price.is_some_and(|p| p < 0.0) {
            return Err(CatalogError::NegativePrice);
        }
        if patch.stock.is_some_and(|s| s < 0) {
            return Err(CatalogError::NegativeStock);
        }

        Ok(self.products.update(id, &patch).await?)
    }

    /// Delete a product.
    ///
    /// Existing cart lines referencing the product are left in place; the
    /// cart read side resolves them to `null`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }
}
