//! Authentication request/response models

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::core::error::{AppError, Result, ValidationErrors};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const SIGNUP_MESSAGE: &str = "User registered successfully";
pub const SIGNIN_MESSAGE: &str = "Login successful";
pub const AUTHORIZED_MESSAGE: &str = "You are authorized";
pub const TOKEN_TYPE: &str = "bearer";

/// Minimum password length accepted at signup, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email regex is valid");
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Input checks run after a request body is deserialized
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "value is not a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            errors.add(
                "password",
                format!("must be at most {} bytes", MAX_PASSWORD_BYTES),
            );
        }
        errors.into_result()
    }
}

/// Signin request
#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl Validate for SigninRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "value is not a valid email address");
        }
        errors.into_result()
    }
}

/// Signup response
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub message: String,
}

/// Signin response carrying the access token
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub email: String,
    pub message: String,
    pub access_token: String,
    pub token_type: String,
}

/// Response for the protected identity endpoint
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub message: String,
    pub email: String,
}

/// JSON body extractor that also runs `Validate`.
///
/// Both unparseable bodies and failed checks come back as `ValidationError` (422).
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::ValidationError(ValidationErrors::body(rejection.body_text())))?;
        value.validate()?;
        Ok(Self(value))
    }
}
