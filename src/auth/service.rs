//! Signup and signin workflow
//!
//! Composes the user store, the password hasher and the token service.
//! Neither operation keeps state between calls.

use crate::auth::jwt::TokenService;
use crate::auth::models::{
    TokenResponse, UserResponse, SIGNIN_MESSAGE, SIGNUP_MESSAGE, TOKEN_TYPE,
};
use crate::auth::password::PasswordHasher;
use crate::core::error::{AppError, Result};
use crate::db::models::User;
use crate::db::repository::{StoreError, UserStore};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// The existence check and the insert are not atomic; a concurrent signup
    /// for the same email that wins the race makes our insert fail with a
    /// duplicate key, which is reported the same way as the early check.
    pub async fn signup(&self, email: &str, password: &str) -> Result<UserResponse> {
        info!(email = %email, "User registration attempt");

        if self.store.find_by_email(email).await?.is_some() {
            warn!(email = %email, "Registration rejected: email already registered");
            return Err(AppError::EmailAlreadyRegistered);
        }

        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;
        let user = User {
            email: email.to_string(),
            password_hash,
        };

        match self.store.insert(&user).await {
            Ok(()) => {
                info!(email = %email, "User registered successfully");
                Ok(UserResponse {
                    email: user.email,
                    message: SIGNUP_MESSAGE.to_string(),
                })
            }
            Err(StoreError::DuplicateKey(_)) => {
                warn!(email = %email, "Registration lost a concurrent insert race");
                Err(AppError::EmailAlreadyRegistered)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticate a user and issue an access token
    pub async fn signin(&self, email: &str, password: &str) -> Result<TokenResponse> {
        info!(email = %email, "Login attempt");

        let user = self.store.find_by_email(email).await?.ok_or_else(|| {
            warn!(email = %email, "Login rejected: unknown email");
            AppError::NoSuchUser
        })?;

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash)
            .await?;
        if !matches {
            warn!(email = %email, "Login rejected: invalid password");
            return Err(AppError::InvalidPassword);
        }

        let access_token = self.tokens.issue(&user.email)?;

        info!(email = %email, "Login successful");

        Ok(TokenResponse {
            email: user.email,
            message: SIGNIN_MESSAGE.to_string(),
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryUserStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(b"test-secret", Algorithm::HS256, Duration::minutes(30)))
    }

    fn service_with(store: Arc<dyn UserStore>) -> AuthService {
        AuthService::new(store, PasswordHasher::new(4), tokens())
    }

    #[tokio::test]
    async fn test_signup_stores_hash_not_password() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone());

        let response = service.signup("a@x.com", "secret1").await.unwrap();

        assert_eq!(response.email, "a@x.com");
        assert_eq!(response.message, "User registered successfully");
        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(PasswordHasher::new(4).verify("secret1", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_signup() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone());

        service.signup("a@x.com", "secret1").await.unwrap();
        let err = service.signup("a@x.com", "another").await.unwrap_err();

        assert!(matches!(err, AppError::EmailAlreadyRegistered));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_signin_issues_verifiable_token() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));
        service.signup("a@x.com", "secret1").await.unwrap();

        let response = service.signin("a@x.com", "secret1").await.unwrap();

        assert_eq!(response.message, "Login successful");
        assert_eq!(response.token_type, "bearer");
        assert_eq!(tokens().verify(&response.access_token).unwrap(), "a@x.com");
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));
        service.signup("a@x.com", "secret1").await.unwrap();

        let err = service.signin("a@x.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPassword));
    }

    #[tokio::test]
    async fn test_signin_unknown_email() {
        let service = service_with(Arc::new(InMemoryUserStore::new()));

        let err = service.signin("nobody@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::NoSuchUser));
    }

    #[tokio::test]
    async fn test_signin_with_corrupt_stored_hash() {
        let store = Arc::new(InMemoryUserStore::new());
        store
            .insert(&User {
                email: "a@x.com".to_string(),
                password_hash: "garbage".to_string(),
            })
            .await
            .unwrap();
        let service = service_with(store);

        let err = service.signin("a@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPassword));
    }

    /// Store whose lookup never sees the competing signup, as in a lost race
    struct RacingStore;

    #[async_trait]
    impl UserStore for RacingStore {
        async fn find_by_email(&self, _email: &str) -> std::result::Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, user: &User) -> std::result::Result<(), StoreError> {
            Err(StoreError::DuplicateKey(user.email.clone()))
        }
    }

    #[tokio::test]
    async fn test_insert_race_maps_to_already_registered() {
        let service = service_with(Arc::new(RacingStore));

        let err = service.signup("a@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyRegistered));
    }

    /// Store that always fails, for error propagation
    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn find_by_email(&self, _email: &str) -> std::result::Result<Option<User>, StoreError> {
            Err(StoreError::Pool("connection refused".into()))
        }

        async fn insert(&self, _user: &User) -> std::result::Result<(), StoreError> {
            Err(StoreError::Pool("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let service = service_with(Arc::new(BrokenStore));

        let err = service.signin("a@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::StoreError(_)));
        assert!(err.status_code().is_server_error());
    }
}
