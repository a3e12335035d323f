//! Product catalog route handlers.
//!
//! Reads are public; writes require the admin role.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use tangelo_core::ProductId;

use crate::error::{Result, missing_field};
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, Product, ProductPatch};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
}

/// Request body for creating a product.
///
/// Fields are optional so presence can be validated explicitly, yielding a
/// field-specific 400 instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct> {
        Ok(NewProduct {
            name: self.name.ok_or_else(|| missing_field("name"))?,
            description: self.description.ok_or_else(|| missing_field("description"))?,
            price: self.price.ok_or_else(|| missing_field("price"))?,
            category: self.category.ok_or_else(|| missing_field("category"))?,
            stock: self.stock.ok_or_else(|| missing_field("stock"))?,
            image_url: self.image_url,
        })
    }
}

/// Request body for a partial product update; only supplied fields change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            category: body.category,
            stock: body.stock,
            image_url: body.image_url,
        }
    }
}

/// List all products.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.list().await?))
}

/// Get a product by ID.
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.get(id).await?))
}

/// Create a product (admin only).
async fn create(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let data = body.into_new_product()?;

    let catalog = CatalogService::new(state.pool());
    let product = catalog.create(data).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Merge the supplied fields into a product (admin only).
async fn update(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.update(id, body.into()).await?))
}

/// Delete a product (admin only).
async fn delete_one(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let catalog = CatalogService::new(state.pool());
    catalog.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
