//! JWT token utilities for authentication.
//!
//! Issues access/refresh token pairs signed with two distinct HS256 secrets
//! and verifies either kind. A token signed for one purpose never verifies
//! for the other.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::errors::{ServiceError, ServiceResult};

/// JWT Claims structure shared by access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

/// Access and refresh token issued together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing and verification keys for one token kind
struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl TokenKeys {
    fn new(secret: &str, expires_in_seconds: u64) -> ServiceResult<Self> {
        let expires_in = i64::try_from(expires_in_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                ServiceError::internal_error(format!(
                    "Token lifetime out of range: {}s",
                    expires_in_seconds
                ))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        })
    }

    fn sign(&self, user_id: &str, email: &str, now: DateTime<Utc>) -> ServiceResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }
}

/// JWT token issuer for creating and validating token pairs
#[derive(Clone)]
pub struct TokenIssuer {
    access: Arc<TokenKeys>,
    refresh: Arc<TokenKeys>,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a new TokenIssuer from injected configuration
    pub fn new(config: &TokenConfig) -> ServiceResult<Self> {
        config
            .validate()
            .map_err(|e| ServiceError::internal_error(format!("Config error: {}", e)))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(TokenIssuer {
            access: Arc::new(TokenKeys::new(
                &config.access_secret,
                config.access_expires_in_seconds,
            )?),
            refresh: Arc::new(TokenKeys::new(
                &config.refresh_secret,
                config.refresh_expires_in_seconds,
            )?),
            validation,
        })
    }

    /// Issue a fresh token pair for a user
    pub async fn issue(&self, user_id: &str, email: &str) -> ServiceResult<TokenPair> {
        self.issue_at(user_id, email, Utc::now()).await
    }

    /// Issue a token pair as if signed at `now`
    ///
    /// The two signings do not depend on each other and run on separate
    /// blocking tasks.
    pub async fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<TokenPair> {
        let access_task = {
            let keys = self.access.clone();
            let (user_id, email) = (user_id.to_string(), email.to_string());
            tokio::task::spawn_blocking(move || keys.sign(&user_id, &email, now))
        };
        let refresh_task = {
            let keys = self.refresh.clone();
            let (user_id, email) = (user_id.to_string(), email.to_string());
            tokio::task::spawn_blocking(move || keys.sign(&user_id, &email, now))
        };

        let (access_token, refresh_token) = tokio::try_join!(access_task, refresh_task)
            .map_err(|e| ServiceError::internal_error(format!("Signing task failed: {}", e)))?;

        Ok(TokenPair {
            access_token: access_token?,
            refresh_token: refresh_token?,
        })
    }

    /// Validate and decode an access token
    pub fn verify_access(&self, token: &str) -> ServiceResult<Claims> {
        self.verify(token, &self.access)
    }

    /// Validate and decode a refresh token
    pub fn verify_refresh(&self, token: &str) -> ServiceResult<Claims> {
        self.verify(token, &self.refresh)
    }

    fn verify(&self, token: &str, keys: &TokenKeys) -> ServiceResult<Claims> {
        decode::<Claims>(token, &keys.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                ServiceError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&TokenConfig::new("access-secret", "refresh-secret")).unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_verify_pair() {
        let issuer = issuer();
        let pair = issuer.issue("user-1", "a@x.com").await.unwrap();

        let access = issuer.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, "user-1");
        assert_eq!(access.email, "a@x.com");
        assert_eq!(access.exp - access.iat, 900);

        let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, "user-1");
        assert_eq!(refresh.exp - refresh.iat, 172_800);
    }

    #[tokio::test]
    async fn test_secrets_are_not_interchangeable() {
        let issuer = issuer();
        let pair = issuer.issue("user-1", "a@x.com").await.unwrap();

        assert!(matches!(
            issuer.verify_access(&pair.refresh_token),
            Err(ServiceError::InvalidToken)
        ));
        assert!(matches!(
            issuer.verify_refresh(&pair.access_token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_tokens_issued_together_are_unique() {
        let issuer = issuer();
        let now = Utc::now();
        let first = issuer.issue_at("user-1", "a@x.com", now).await.unwrap();
        let second = issuer.issue_at("user-1", "a@x.com", now).await.unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[tokio::test]
    async fn test_access_token_expiry_window() {
        let issuer = issuer();

        let stale = Utc::now() - Duration::seconds(15 * 60 + 1);
        let expired = issuer.issue_at("user-1", "a@x.com", stale).await.unwrap();
        assert!(matches!(
            issuer.verify_access(&expired.access_token),
            Err(ServiceError::InvalidToken)
        ));

        let recent = Utc::now() - Duration::seconds(15 * 60 - 5);
        let fresh = issuer.issue_at("user-1", "a@x.com", recent).await.unwrap();
        assert!(issuer.verify_access(&fresh.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_token_expiry_window() {
        let issuer = issuer();
        let two_days = 60 * 60 * 24 * 2;

        let stale = Utc::now() - Duration::seconds(two_days + 1);
        let expired = issuer.issue_at("user-1", "a@x.com", stale).await.unwrap();
        assert!(matches!(
            issuer.verify_refresh(&expired.refresh_token),
            Err(ServiceError::InvalidToken)
        ));

        let recent = Utc::now() - Duration::seconds(two_days - 5);
        let fresh = issuer.issue_at("user-1", "a@x.com", recent).await.unwrap();
        assert!(issuer.verify_refresh(&fresh.refresh_token).is_ok());
    }

    #[test]
    fn test_oversized_lifetime_rejected_without_panic() {
        let mut config = TokenConfig::new("access-secret", "refresh-secret");
        config.access_expires_in_seconds = 10_000_000_000_000_000;
        assert!(TokenIssuer::new(&config).is_err());

        let mut config = TokenConfig::new("access-secret", "refresh-secret");
        config.refresh_expires_in_seconds = u64::MAX;
        assert!(TokenIssuer::new(&config).is_err());

        // Key construction refuses lifetimes chrono cannot represent.
        assert!(TokenKeys::new("secret", u64::MAX).is_err());
        assert!(TokenKeys::new("secret", 10_000_000_000_000_000).is_err());
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let issuer = issuer();
        let pair = issuer.issue("user-1", "a@x.com").await.unwrap();

        let mut parts: Vec<String> = pair.access_token.split('.').map(String::from).collect();
        let forged = TokenIssuer::new(&TokenConfig::new("other-access", "other-refresh"))
            .unwrap()
            .issue("user-2", "b@x.com")
            .await
            .unwrap();
        parts[1] = forged.access_token.split('.').nth(1).unwrap().to_string();

        assert!(issuer.verify_access(&parts.join(".")).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify_access("not.a.jwt"),
            Err(ServiceError::InvalidToken)
        ));
        assert!(issuer.verify_refresh("").is_err());
    }

    #[test]
    fn test_shared_secret_rejected() {
        assert!(TokenIssuer::new(&TokenConfig::new("same", "same")).is_err());
    }
}
