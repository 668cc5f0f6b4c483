//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse request data, validate input, and delegate to
//! `auth::service` for the token lifecycle.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::TokenPair;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use validator::Validate;

/// Handle local signup request
#[axum::debug_handler]
pub async fn signup(
    Extension(auth): Extension<AuthService>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, ResponseJson<TokenPair>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    match auth.signup(&payload.email, &payload.password).await {
        Ok(tokens) => Ok((StatusCode::CREATED, ResponseJson(tokens))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle local signin request
#[axum::debug_handler]
pub async fn signin(
    Extension(auth): Extension<AuthService>,
    Json(payload): Json<SigninRequest>,
) -> Result<ResponseJson<TokenPair>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    match auth.signin(&payload.email, &payload.password).await {
        Ok(tokens) => Ok(ResponseJson(tokens)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request for the authenticated user
#[axum::debug_handler]
pub async fn logout(
    Extension(auth): Extension<AuthService>,
    Extension(user): Extension<AuthUser>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    match auth.logout(&user.user_id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Logged out"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh(
    Extension(auth): Extension<AuthService>,
    Extension(user): Extension<RefreshUser>,
) -> Result<ResponseJson<TokenPair>, (StatusCode, String)> {
    match auth.refresh(&user.user_id, &user.refresh_token).await {
        Ok(tokens) => Ok(ResponseJson(tokens)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Return the identity carried by the access token
#[axum::debug_handler]
pub async fn me(Extension(user): Extension<AuthUser>) -> ResponseJson<ApiResponse<AuthUser>> {
    ResponseJson(ApiResponse::ok(user))
}
