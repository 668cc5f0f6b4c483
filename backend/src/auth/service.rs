//! Core business logic for the authentication system.
//!
//! Each user has at most one active refresh token. Its argon2 hash lives on
//! the user record; signin and refresh overwrite it, logout clears it. A
//! refresh token is single-use: rotation swaps the stored hash atomically, so
//! a replayed token no longer matches.

use crate::auth::password::PasswordHasher;
use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserStore;
use crate::utils::jwt::{TokenIssuer, TokenPair};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Authentication service for signup, signin, logout and token refresh
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    /// Verified against on unknown-email signins so both rejection paths
    /// cost one argon2 verification.
    dummy_hash: Arc<str>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenIssuer) -> ServiceResult<Self> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash("unregistered-account-placeholder")?.into();

        Ok(AuthService {
            store,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new user and open their first session
    ///
    /// # Errors
    /// Returns `ServiceError::DuplicateEmail` if the email is taken. If the
    /// refresh hash cannot be stored after the user row is created, the error
    /// is returned and the user stays logged out until the next signin.
    #[tracing::instrument(skip_all)]
    pub async fn signup(&self, email: &str, password: &str) -> ServiceResult<TokenPair> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = self.hash_blocking(password).await?;
        let user = self.store.create(email, &password_hash).await?;
        info!(user_id = %user.id, "User registered");

        self.start_session(&user).await
    }

    /// Authenticate with email and password
    ///
    /// # Errors
    /// Returns `ServiceError::InvalidCredentials` for an unknown email and for
    /// a wrong password alike.
    #[tracing::instrument(skip_all)]
    pub async fn signin(&self, email: &str, password: &str) -> ServiceResult<TokenPair> {
        let Some(user) = self.store.find_by_email(email).await? else {
            // Unknown emails still pay for one verification.
            if let Err(e) = self.verify_blocking(&self.dummy_hash, password).await {
                error!("Dummy password verification failed: {}", e);
            }
            warn!("Sign-in rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        match self.verify_blocking(&user.password_hash, password).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Sign-in rejected");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(ServiceError::MalformedHash) => {
                error!(user_id = %user.id, "Stored password hash is malformed");
                return Err(ServiceError::MalformedHash);
            }
            Err(e) => return Err(e),
        }

        info!(user_id = %user.id, "User signed in");
        self.start_session(&user).await
    }

    /// End the user's session
    ///
    /// Silent no-op when the user is absent or already logged out.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self, user_id: &str) -> ServiceResult<()> {
        if self.store.clear_refresh_token_hash(user_id).await? {
            info!("User logged out");
        }
        Ok(())
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// `user_id` is the subject of the already-verified refresh token.
    ///
    /// # Errors
    /// Returns `ServiceError::AccessDenied` if the user is absent, has no
    /// active refresh token, presents a token that does not match the stored
    /// hash, or lost a concurrent rotation of the same token.
    #[tracing::instrument(skip(self, presented_refresh_token))]
    pub async fn refresh(
        &self,
        user_id: &str,
        presented_refresh_token: &str,
    ) -> ServiceResult<TokenPair> {
        let Some(user) = self.store.find_by_id(user_id).await? else {
            warn!("Refresh rejected: unknown user");
            return Err(ServiceError::AccessDenied);
        };
        let Some(stored_hash) = user.refresh_token_hash.as_deref() else {
            warn!("Refresh rejected: no active session");
            return Err(ServiceError::AccessDenied);
        };

        match self.verify_blocking(stored_hash, presented_refresh_token).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Refresh rejected: token mismatch");
                return Err(ServiceError::AccessDenied);
            }
            Err(ServiceError::MalformedHash) => {
                error!("Stored refresh token hash is malformed");
                return Err(ServiceError::AccessDenied);
            }
            Err(e) => return Err(e),
        }

        let tokens = self.tokens.issue(&user.id, &user.email).await?;
        let new_hash = self.hash_blocking(&tokens.refresh_token).await?;

        if !self
            .store
            .rotate_refresh_token_hash(&user.id, stored_hash, &new_hash)
            .await?
        {
            warn!("Refresh rejected: token already rotated");
            return Err(ServiceError::AccessDenied);
        }

        info!("Refresh token rotated");
        Ok(tokens)
    }

    /// Issue a pair and make its refresh token the only valid one
    async fn start_session(&self, user: &User) -> ServiceResult<TokenPair> {
        let tokens = self.tokens.issue(&user.id, &user.email).await?;
        let refresh_hash = self.hash_blocking(&tokens.refresh_token).await?;
        self.store
            .set_refresh_token_hash(&user.id, Some(&refresh_hash))
            .await?;
        Ok(tokens)
    }

    async fn hash_blocking(&self, plaintext: &str) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, hash: &str, plaintext: &str) -> ServiceResult<bool> {
        let hasher = self.hasher.clone();
        let (hash, plaintext) = (hash.to_string(), plaintext.to_string());
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &plaintext))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Verification task failed: {}", e)))?
    }
}
