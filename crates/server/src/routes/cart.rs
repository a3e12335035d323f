//! Cart route handlers.
//!
//! Every cart route operates on the authenticated caller's own cart; the
//! user ID comes from the verified token, never from the request.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::Deserialize;

use tangelo_core::ProductId;

use crate::error::{Result, missing_field};
use crate::middleware::RequireAuth;
use crate::models::cart::Cart;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_item))
        .route("/remove/{product_id}", delete(remove_item))
        .route("/clear", delete(clear))
}

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

/// Get the caller's cart, creating an empty one on first access.
async fn get_cart(
    RequireAuth(credential): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Cart>> {
    let carts = CartService::new(state.pool());
    Ok(Json(carts.get_or_create(credential.user_id).await?))
}

/// Add a quantity of a product to the caller's cart, merging by product.
async fn add_item(
    RequireAuth(credential): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    let product_id = body.product_id.ok_or_else(|| missing_field("productId"))?;
    let quantity = body.quantity.ok_or_else(|| missing_field("quantity"))?;

    let carts = CartService::new(state.pool());
    Ok(Json(
        carts
            .add_item(credential.user_id, product_id, quantity)
            .await?,
    ))
}

/// Remove a product from the caller's cart (no-op if absent).
async fn remove_item(
    RequireAuth(credential): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Cart>> {
    let carts = CartService::new(state.pool());
    Ok(Json(
        carts.remove_item(credential.user_id, product_id).await?,
    ))
}

/// Empty the caller's cart.
async fn clear(
    RequireAuth(credential): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Cart>> {
    let carts = CartService::new(state.pool());
    Ok(Json(carts.clear(credential.user_id).await?))
}
