//! Tangelo Server - Small e-commerce REST API.
//!
//! This binary serves the JSON API on port 3000 (configurable).
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies
//! - `SQLite` via sqlx for accounts, catalog, and carts
//! - Signed bearer tokens (`x-access-token` header) for authentication
//!
//! # Startup
//!
//! 1. Load configuration from the environment (`.env` honored)
//! 2. Open the database pool and run embedded migrations
//! 3. Create the configured admin account if it doesn't exist yet
//! 4. Serve until Ctrl+C / SIGTERM

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tangelo_server::config::AppConfig;
use tangelo_server::db;
use tangelo_server::routes;
use tangelo_server::services::auth::{AuthError, AuthService};
use tangelo_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tangelo_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Run embedded migrations. The schema carries the uniqueness invariants
    // (usernames, product names, one cart per user), so it must be in place
    // before the first request.
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // Build application state
    let state = AppState::new(config.clone(), pool);

    // Create the configured admin account, if any
    bootstrap_admin(&state).await;

    // Build router
    let app = routes::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Create the admin account named in configuration, if it doesn't exist.
///
/// An already-existing account is left untouched; other failures are logged
/// but don't abort startup.
async fn bootstrap_admin(state: &AppState) {
    let Some(bootstrap) = state.config().admin_bootstrap.clone() else {
        return;
    };

    let auth = AuthService::new(state.pool(), state.tokens());
    match auth
        .register_admin(&bootstrap.username, bootstrap.password.expose_secret())
        .await
    {
        Ok(user) => tracing::info!(username = %user.username, "admin account created"),
        Err(AuthError::UserAlreadyExists) => {
            tracing::debug!(username = %bootstrap.username, "admin account already exists");
        }
        Err(e) => tracing::error!(error = %e, "failed to create admin account"),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
