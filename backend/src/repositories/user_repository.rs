//! Database repository for user management operations.
//!
//! Defines the `UserStore` seam consumed by the authentication service and
//! its SQLite implementation.

use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Persistence operations on user records required by authentication.
///
/// Every method is atomic on its own. Callers that need a read-verify-write
/// sequence use `rotate_refresh_token_hash`, which performs the write only if
/// the stored hash is still the one that was read.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user with no active refresh token.
    ///
    /// # Errors
    /// `ServiceError::DuplicateEmail` if the email is already registered
    async fn create(&self, email: &str, password_hash: &str) -> ServiceResult<User>;

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>>;

    /// Unconditionally sets or clears the refresh token hash.
    async fn set_refresh_token_hash(&self, id: &str, hash: Option<&str>) -> ServiceResult<()>;

    /// Replaces the refresh token hash only if it currently equals `expected`.
    ///
    /// # Returns
    /// `true` if the swap happened
    async fn rotate_refresh_token_hash(
        &self,
        id: &str,
        expected: &str,
        new_hash: &str,
    ) -> ServiceResult<bool>;

    /// Clears the refresh token hash if one is set.
    ///
    /// # Returns
    /// `true` if a session was cleared
    async fn clear_refresh_token_hash(&self, id: &str) -> ServiceResult<bool>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct SqliteUserStore {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Creates a new SqliteUserStore instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool, already migrated
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> ServiceResult<User> {
        let id = Uuid::now_v7().to_string();
        let now = Utc::now();

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, refresh_token_hash, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            RETURNING id, email, password_hash, refresh_token_hash, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
                Err(ServiceError::DuplicateEmail)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to create user")
                .into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, refresh_token_hash, created_at, updated_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, refresh_token_hash, created_at, updated_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by id")?;

        Ok(user)
    }

    async fn set_refresh_token_hash(&self, id: &str, hash: Option<&str>) -> ServiceResult<()> {
        sqlx::query("UPDATE users SET refresh_token_hash = ?, updated_at = ? WHERE id = ?")
            .bind(hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update refresh token hash")?;

        Ok(())
    }

    async fn rotate_refresh_token_hash(
        &self,
        id: &str,
        expected: &str,
        new_hash: &str,
    ) -> ServiceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET refresh_token_hash = ?, updated_at = ?
            WHERE id = ? AND refresh_token_hash = ?
            "#,
        )
        .bind(new_hash)
        .bind(Utc::now())
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await
        .context("Failed to rotate refresh token hash")?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token_hash(&self, id: &str) -> ServiceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET refresh_token_hash = NULL, updated_at = ?
            WHERE id = ? AND refresh_token_hash IS NOT NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to clear refresh token hash")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn repository() -> SqliteUserStore {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserStore::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repository().await;
        let user = repo.create("a@x.com", "hash").await.unwrap();

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.refresh_token_hash, None);

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = repository().await;
        repo.create("a@x.com", "hash").await.unwrap();

        let result = repo.create("a@x.com", "other").await;
        assert!(matches!(result, Err(ServiceError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_set_and_clear_refresh_token_hash() {
        let repo = repository().await;
        let user = repo.create("a@x.com", "hash").await.unwrap();

        repo.set_refresh_token_hash(&user.id, Some("rt-hash"))
            .await
            .unwrap();
        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("rt-hash"));

        assert!(repo.clear_refresh_token_hash(&user.id).await.unwrap());
        assert!(!repo.clear_refresh_token_hash(&user.id).await.unwrap());

        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!stored.has_active_session());
    }

    #[tokio::test]
    async fn test_rotate_is_compare_and_swap() {
        let repo = repository().await;
        let user = repo.create("a@x.com", "hash").await.unwrap();
        repo.set_refresh_token_hash(&user.id, Some("first"))
            .await
            .unwrap();

        assert!(repo
            .rotate_refresh_token_hash(&user.id, "first", "second")
            .await
            .unwrap());
        // The old value no longer matches.
        assert!(!repo
            .rotate_refresh_token_hash(&user.id, "first", "third")
            .await
            .unwrap());

        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_rotate_fails_when_logged_out() {
        let repo = repository().await;
        let user = repo.create("a@x.com", "hash").await.unwrap();

        assert!(!repo
            .rotate_refresh_token_hash(&user.id, "anything", "new")
            .await
            .unwrap());
    }
}
