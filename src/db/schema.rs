//! Store schema
//!
//! A single `users` table keyed by email. Creation is idempotent and runs
//! every time a database is opened.

use crate::db::repository::StoreError;
use rusqlite::Connection;

/// One record per email; the primary key enforces uniqueness
const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    email TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL
);
"#;

/// Create the `users` table if it does not exist yet
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(USERS_TABLE)?;
    Ok(())
}
