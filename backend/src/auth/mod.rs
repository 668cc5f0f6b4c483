//! Authentication module for managing local accounts and sessions.
//!
//! This module provides password hashing, the token lifecycle service, and
//! the HTTP handlers, routes and middleware that expose it.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use password::PasswordHasher;
pub use service::AuthService;
