//! Central module for shared API plumbing.
//!
//! Holds the response envelope and the error-to-HTTP mapping used by every
//! handler, including the authentication routes.

pub mod common;
