//! Database models
//!
//! Data structures representing stored records

use serde::{Deserialize, Serialize};
use std::fmt;

/// User record in the database, keyed uniquely by email
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password_hash: String,
}

// Hand-written so the hash never ends up in a log line via `{:?}`
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
