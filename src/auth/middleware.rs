//! Access guard for protected routes
//!
//! Resolves `Authorization: Bearer <token>` to the caller's email. The
//! middleware stores the result in request extensions; handlers pick it up
//! through the `AuthUser` extractor.

use crate::api::handlers::AppState;
use crate::auth::jwt::TokenService;
use crate::core::error::{AppError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Identity of an authenticated caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// Pull the token out of a `Bearer <token>` authorization header.
///
/// The scheme is matched case-insensitively; the token must be a single
/// non-empty word.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    Some(token)
}

/// Resolve the caller's identity from request headers
pub fn resolve(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser> {
    let token = bearer_token(headers).ok_or_else(|| AppError::unauthorized(NOT_AUTHENTICATED))?;
    let email = tokens.verify(token)?;
    Ok(AuthUser { email })
}

/// Authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match resolve(request.headers(), &state.tokens) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(email = %user.email, "Request authenticated");
    request.extensions_mut().insert(user);

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(NOT_AUTHENTICATED))
    }
}
