//! Main entry point for the authgate backend.
//!
//! Initializes tracing, loads configuration, connects the database and
//! serves the Axum router.

use anyhow::{Context, Result};
use authgate::auth::AuthService;
use authgate::config::Config;
use authgate::database::Database;
use authgate::repositories::SqliteUserStore;
use authgate::utils::jwt::TokenIssuer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;

    let store = Arc::new(SqliteUserStore::new(db.pool().clone()));
    let tokens = TokenIssuer::new(&config.tokens)?;
    let auth = AuthService::new(store, tokens)?;

    let app = authgate::app(auth);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting authgate server on port {}", config.server_port);
    axum::serve(listener, app).await.context("Server error")?;

    db.close().await;
    Ok(())
}
