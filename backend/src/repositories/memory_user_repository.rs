//! In-memory `UserStore` for tests and database-less runs.

use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users keyed by id. Each operation holds the write lock for its whole
/// duration, so every call is atomic.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> ServiceResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == email) {
            return Err(ServiceError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn set_refresh_token_hash(&self, id: &str, hash: Option<&str>) -> ServiceResult<()> {
        if let Some(user) = self.users.write().await.get_mut(id) {
            user.refresh_token_hash = hash.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn rotate_refresh_token_hash(
        &self,
        id: &str,
        expected: &str,
        new_hash: &str,
    ) -> ServiceResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(expected) => {
                user.refresh_token_hash = Some(new_hash.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token_hash(&self, id: &str) -> ServiceResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) if user.refresh_token_hash.is_some() => {
                user.refresh_token_hash = None;
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
