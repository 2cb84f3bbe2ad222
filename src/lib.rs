//! Interview With AI authentication backend
//!
//! Registers users with a bcrypt-hashed password, authenticates returning
//! users, and issues/verifies the bearer tokens that guard protected routes.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::{AppError, Config};
pub use api::{ApiServer, AppState};
pub use auth::{AuthService, PasswordHasher, TokenService};
pub use db::{DatabaseManager, InMemoryUserStore, UserRepository, UserStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
