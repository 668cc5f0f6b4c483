//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Persisted user record.
///
/// `refresh_token_hash` is set exactly while the user holds an active,
/// unconsumed refresh token.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user currently holds a refresh token.
    pub fn has_active_session(&self) -> bool {
        self.refresh_token_hash.is_some()
    }
}
