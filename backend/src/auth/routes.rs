//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle signup, signin, logout and token refreshing, and are
//! designed to be nested into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
///
/// Expects an `Extension<AuthService>` layer on the enclosing router.
pub fn auth_router() -> Router {
    Router::new()
        .route("/local/signup", post(signup))
        .route("/local/signin", post(signin))
        .route(
            "/local/logout",
            post(logout).layer(middleware::from_fn(access_auth)),
        )
        .route("/refresh", post(refresh).layer(middleware::from_fn(refresh_auth)))
        .route("/me", get(me).layer(middleware::from_fn(access_auth)))
}
