//! Database manager implementation
//!
//! This module provides database connection management with:
//! - SQLite connection pool using r2d2
//! - Async wrapper for blocking database operations
//! - Schema creation on startup

use crate::db::repository::StoreError;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tokio::task;

/// Database manager with connection pool
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<SqliteConnectionManager>,
}

impl DatabaseManager {
    /// Create a new DatabaseManager with the specified database path and pool size
    pub fn new(db_path: &Path, pool_size: u32, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            // WAL lets readers proceed while a signup is writing
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        let manager = Self { pool };

        manager.migrate()?;

        Ok(manager)
    }

    /// Create a new DatabaseManager with an in-memory database for testing
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::memory();

        // Every in-memory connection is its own database, so keep exactly one
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        let manager = Self { pool };

        manager.migrate()?;

        Ok(manager)
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }

    /// Execute a database operation asynchronously
    ///
    /// This wraps synchronous database operations in tokio::task::spawn_blocking
    /// to avoid blocking the async runtime.
    pub async fn execute<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("Database task panicked: {}", e)))?
    }

    /// Create the user table if it is missing
    pub fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.get_connection()?;
        crate::db::schema::ensure_schema(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_db() -> (DatabaseManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("auth.db");
        let manager = DatabaseManager::new(&db_path, 5, Duration::from_secs(5)).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_database_manager_creation() {
        let (manager, temp_dir) = create_test_db();
        assert_eq!(manager.pool.max_size(), 5);
        assert!(temp_dir.path().join("nested").join("auth.db").exists());
    }

    #[tokio::test]
    async fn test_execute_sees_schema() {
        let (manager, _temp_dir) = create_test_db();

        let count: i64 = manager
            .execute(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
            })
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let manager = DatabaseManager::new_in_memory().unwrap();

        let result = manager
            .execute(|conn| {
                conn.execute(
                    "INSERT INTO users (email, password_hash) VALUES ('a@x.com', 'h')",
                    [],
                )?;
                Ok(())
            })
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = DatabaseManager::new(&blocker.join("auth.db"), 1, Duration::from_secs(1));

        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_reopen_keeps_existing_users() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("auth.db");

        {
            let manager = DatabaseManager::new(&db_path, 1, Duration::from_secs(1)).unwrap();
            manager
                .get_connection()
                .unwrap()
                .execute(
                    "INSERT INTO users (email, password_hash) VALUES ('a@x.com', 'h')",
                    [],
                )
                .unwrap();
        }

        let manager = DatabaseManager::new(&db_path, 1, Duration::from_secs(1)).unwrap();
        let count: i64 = manager
            .get_connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
