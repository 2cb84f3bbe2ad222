//! JWT token generation and validation

use crate::core::config::{ConfigError, SecurityConfig};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed, expired or missing subject; callers are not told which
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Failed to generate token: {0}")]
    Encoding(String),
}

/// Issues and verifies signed, time-limited access tokens
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm, lifetime: Duration) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Build from the security section of the configuration
    pub fn from_config(config: &SecurityConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.secret_key.as_bytes(),
            config.jwt_algorithm()?,
            Duration::minutes(config.access_token_expire_minutes),
        ))
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject` expiring one lifetime from now
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expiry = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Encoding("Failed to calculate expiration".to_string()))?;

        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is live only while `now < exp`; no leeway is applied.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the supplied clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            tracing::debug!("Token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        match claims.sub {
            Some(subject) if !subject.is_empty() => Ok(subject),
            _ => Err(TokenError::InvalidToken),
        }
    }
}
