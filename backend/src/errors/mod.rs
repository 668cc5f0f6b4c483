//! Global application error types.
//!
//! This module defines the error type shared by the store, the token issuer
//! and the authentication service. Credential failures carry fixed, generic
//! messages so a caller cannot tell which check rejected the request.

use thiserror::Error;

/// Generic service error that can be used across all components
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email and wrong password both map here.
    #[error("Email or password incorrect")]
    InvalidCredentials,

    /// Absent user, no active refresh token, or hash mismatch.
    #[error("Access denied")]
    AccessDenied,

    #[error("Stored hash is malformed")]
    MalformedHash,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "duplicate_email",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccessDenied => "access_denied",
            Self::MalformedHash => "internal_error",
            Self::InvalidToken => "invalid_token",
            Self::Validation { .. } => "validation_error",
            Self::Database { .. } => "database_error",
            Self::InternalError { .. } => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_are_generic() {
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "Email or password incorrect"
        );
        assert_eq!(ServiceError::AccessDenied.to_string(), "Access denied");
    }

    #[test]
    fn test_malformed_hash_does_not_leak_a_distinct_code() {
        assert_eq!(ServiceError::MalformedHash.error_code(), "internal_error");
    }

    #[test]
    fn test_database_error_from_anyhow() {
        let error: ServiceError = anyhow::anyhow!("disk full").into();
        assert_eq!(error.error_code(), "database_error");
    }
}
