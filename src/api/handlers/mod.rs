pub mod system;

pub use system::*;

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::auth::service::AuthService;
use crate::db::repository::UserStore;
use std::sync::Arc;

/// Shared application state for handlers.
///
/// Built once at startup; everything inside is read-only or internally
/// synchronized, so clones can serve concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        let tokens = Arc::new(tokens);
        let auth = Arc::new(AuthService::new(store, hasher, tokens.clone()));
        Self { auth, tokens }
    }
}
