//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, and the two token signing secrets.

use anyhow::{Context, Result, bail};
use std::env;

/// Signing material and lifetimes for the two token kinds.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expires_in_seconds: u64,
    pub refresh_expires_in_seconds: u64,
}

// Secrets stay out of Debug output.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_expires_in_seconds", &self.access_expires_in_seconds)
            .field("refresh_expires_in_seconds", &self.refresh_expires_in_seconds)
            .finish()
    }
}

impl TokenConfig {
    /// Access tokens live for 15 minutes.
    pub const DEFAULT_ACCESS_EXPIRES_IN_SECONDS: u64 = 60 * 15;
    /// Refresh tokens live for 2 days.
    pub const DEFAULT_REFRESH_EXPIRES_IN_SECONDS: u64 = 60 * 60 * 24 * 2;
    /// Upper bound for either lifetime: one year.
    pub const MAX_EXPIRES_IN_SECONDS: u64 = 60 * 60 * 24 * 365;

    /// Builds a config with the default lifetimes.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_expires_in_seconds: Self::DEFAULT_ACCESS_EXPIRES_IN_SECONDS,
            refresh_expires_in_seconds: Self::DEFAULT_REFRESH_EXPIRES_IN_SECONDS,
        }
    }

    /// Rejects empty or shared secrets and lifetimes outside `1..=MAX_EXPIRES_IN_SECONDS`.
    pub fn validate(&self) -> Result<()> {
        if self.access_secret.is_empty() {
            bail!("ACCESS_TOKEN_SECRET must not be empty");
        }
        if self.refresh_secret.is_empty() {
            bail!("REFRESH_TOKEN_SECRET must not be empty");
        }
        if self.access_secret == self.refresh_secret {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }
        for (name, seconds) in [
            ("ACCESS_TOKEN_EXPIRES_IN_SECONDS", self.access_expires_in_seconds),
            ("REFRESH_TOKEN_EXPIRES_IN_SECONDS", self.refresh_expires_in_seconds),
        ] {
            if seconds == 0 || seconds > Self::MAX_EXPIRES_IN_SECONDS {
                bail!(
                    "{} must be between 1 and {}",
                    name,
                    Self::MAX_EXPIRES_IN_SECONDS
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub tokens: TokenConfig,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let access_secret =
            env::var("ACCESS_TOKEN_SECRET").context("ACCESS_TOKEN_SECRET not set")?;
        let refresh_secret =
            env::var("REFRESH_TOKEN_SECRET").context("REFRESH_TOKEN_SECRET not set")?;

        let access_expires_in_seconds = env::var("ACCESS_TOKEN_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| TokenConfig::DEFAULT_ACCESS_EXPIRES_IN_SECONDS.to_string())
            .parse::<u64>()
            .context("ACCESS_TOKEN_EXPIRES_IN_SECONDS must be a valid number")?;

        let refresh_expires_in_seconds = env::var("REFRESH_TOKEN_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| TokenConfig::DEFAULT_REFRESH_EXPIRES_IN_SECONDS.to_string())
            .parse::<u64>()
            .context("REFRESH_TOKEN_EXPIRES_IN_SECONDS must be a valid number")?;

        let tokens = TokenConfig {
            access_secret,
            refresh_secret,
            access_expires_in_seconds,
            refresh_expires_in_seconds,
        };
        tokens.validate()?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            tokens,
            server_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_defaults() {
        let config = TokenConfig::new("access", "refresh");
        assert_eq!(config.access_expires_in_seconds, 900);
        assert_eq!(config.refresh_expires_in_seconds, 172_800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_config_rejects_shared_secret() {
        let config = TokenConfig::new("same", "same");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_config_rejects_out_of_range_lifetimes() {
        let mut config = TokenConfig::new("access", "refresh");
        config.access_expires_in_seconds = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = TokenConfig::new("access", "refresh");
        config.refresh_expires_in_seconds = 10_000_000_000_000_000;
        assert!(config.validate().is_err());

        let mut config = TokenConfig::new("access", "refresh");
        config.access_expires_in_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = TokenConfig::new("access", "refresh");
        config.refresh_expires_in_seconds = TokenConfig::MAX_EXPIRES_IN_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_config_rejects_empty_secret() {
        assert!(TokenConfig::new("", "refresh").validate().is_err());
        assert!(TokenConfig::new("access", "").validate().is_err());
    }

    #[test]
    fn test_token_config_debug_hides_secrets() {
        let config = TokenConfig::new("top-secret-access", "top-secret-refresh");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
