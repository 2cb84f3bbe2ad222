//! Authentication module
//!
//! This module provides authentication functionality including:
//! - User signup and signin
//! - JWT token issuance and verification
//! - Password hashing and verification
//! - The access guard for protected routes

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use handlers::{me, signin, signup};
pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{authenticate, AuthUser};
pub use password::PasswordHasher;
pub use service::AuthService;
