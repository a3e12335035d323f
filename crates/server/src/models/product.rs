//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tangelo_core::ProductId;

/// A catalog product (domain type).
///
/// Maps directly onto its table row, so it derives `FromRow` instead of
/// going through a separate row type.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name, unique across the catalog.
    pub name: String,
    pub description: String,
    /// Unit price; never negative.
    pub price: f64,
    pub category: String,
    /// Units in stock; never negative.
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// A partial update: only supplied fields are merged into the product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: ProductId::new(),
            name: "Keyboard".to_owned(),
            description: "A keyboard".to_owned(),
            price: 49.99,
            category: "peripherals".to_owned(),
            stock: 12,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        // Absent image URL is omitted rather than null.
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        assert!(
            !ProductPatch {
                price: Some(1.0),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
