//! Local authentication backend.
//!
//! Password signup/signin with short-lived access tokens and rotating,
//! hashed refresh tokens. `app` assembles the Axum router around an
//! `AuthService`; `main.rs` wires it to configuration and SQLite.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod utils;

use crate::api::common::ApiResponse;
use crate::auth::AuthService;
use axum::{Extension, Router, response::Json, routing::get};

/// Builds the full application router.
pub fn app(auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .layer(Extension(auth_service))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "authgate",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the authgate API",
    ))
}
