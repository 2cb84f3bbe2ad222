//! Database module
//!
//! This module provides database management functionality including:
//! - Database connection pool management
//! - The user store adapter and its SQLite / in-memory implementations
//! - Schema creation
//! - Data models

pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;

pub use manager::DatabaseManager;
pub use memory::InMemoryUserStore;
pub use models::User;
pub use repository::{StoreError, UserRepository, UserStore};
