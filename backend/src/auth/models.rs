//! Data structures for authentication requests and verified identities.
//!
//! Request payloads are validated with `validator` before they reach the
//! service. The identity types are inserted into request extensions by the
//! middleware after the bearer token has been verified.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request payload
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signin request payload
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Subject of a verified access token
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Subject of a verified refresh token, with the raw token for hash comparison
#[derive(Clone)]
pub struct RefreshUser {
    pub user_id: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshUser")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
