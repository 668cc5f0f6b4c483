//! Middleware for protecting authenticated routes.
//!
//! Verifies bearer tokens and hands the verified subject to handlers through
//! request extensions. Access-protected routes get an `AuthUser`; the refresh
//! route gets a `RefreshUser` carrying the presented token.

use crate::api::common::service_error_to_http;
use crate::auth::models::{AuthUser, RefreshUser};
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use axum::{
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// 401 with the standard error envelope.
fn unauthorized() -> (StatusCode, String) {
    service_error_to_http(ServiceError::InvalidToken)
}

fn bearer_token(request: &Request) -> Result<String, (StatusCode, String)> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(unauthorized)
}

/// Access token authentication middleware
pub async fn access_auth(
    Extension(auth): Extension<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = bearer_token(&request)?;

    match auth.token_issuer().verify_access(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
                email: claims.email,
            });
            Ok(next.run(request).await)
        }
        Err(_) => Err(unauthorized()),
    }
}

/// Refresh token authentication middleware
pub async fn refresh_auth(
    Extension(auth): Extension<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = bearer_token(&request)?;

    match auth.token_issuer().verify_refresh(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(RefreshUser {
                user_id: claims.sub,
                refresh_token: token,
            });
            Ok(next.run(request).await)
        }
        Err(_) => Err(unauthorized()),
    }
}
