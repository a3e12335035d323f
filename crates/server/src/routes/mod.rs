//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # API (all under /api/v1)
//! GET  /                            - Status probe
//! GET  /ping                        - Ping probe
//!
//! # Auth
//! POST /auth/register               - Register an account
//! POST /auth/adm/register           - Register an admin account (admin only)
//! POST /auth/login                  - Login, returns a bearer token
//!
//! # Products
//! GET    /products                  - List products
//! GET    /products/{id}             - Product detail
//! POST   /products                  - Create product (admin only)
//! PUT    /products/{id}             - Partial update (admin only)
//! DELETE /products/{id}             - Delete product (admin only)
//!
//! # Cart (requires token)
//! GET    /cart                      - Current user's cart (created lazily)
//! POST   /cart/add                  - Add a product, merging by product
//! DELETE /cart/remove/{productId}   - Remove a product (no-op if absent)
//! DELETE /cart/clear                - Empty the cart
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(status))
        .route("/ping", get(ping))
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API status probe.
async fn status() -> Json<serde_json::Value> {
    Json(json!({ "status": true }))
}

/// API ping probe.
async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "pong": true }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
