//! Persistence layer for user records.

pub mod memory_user_repository;
pub mod user_repository;

pub use memory_user_repository::InMemoryUserStore;
pub use user_repository::{SqliteUserStore, UserStore};
