//! User store adapter
//!
//! The auth workflow only ever needs two things from persistence: an exact
//! match lookup by email and an insert that refuses duplicates. `UserStore`
//! captures that contract; `UserRepository` fulfils it with SQLite.

use crate::db::manager::DatabaseManager;
use crate::db::models::User;
use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension};
use std::sync::Arc;

/// Failures surfaced by a user store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Task error: {0}")]
    Task(String),
}

/// Exact-match user persistence, safe to share across concurrent requests
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user whose email matches exactly (case-sensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user; fails with `DuplicateKey` if the email is taken
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
}

/// SQLite-backed user store
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT email, password_hash FROM users WHERE email = ?",
                        [&email],
                        |row| {
                            Ok(User {
                                email: row.get(0)?,
                                password_hash: row.get(1)?,
                            })
                        },
                    )
                    .optional()?)
            })
            .await
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (email, password_hash) VALUES (?, ?)",
                    rusqlite::params![&user.email, &user.password_hash],
                )
                .map_err(|e| match e.sqlite_error_code() {
                    Some(ErrorCode::ConstraintViolation) => StoreError::DuplicateKey(user.email.clone()),
                    _ => StoreError::Database(e),
                })?;
                Ok(())
            })
            .await
    }
}
