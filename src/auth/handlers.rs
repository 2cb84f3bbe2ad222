//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{
    MeResponse, SigninRequest, SignupRequest, TokenResponse, UserResponse, ValidatedJson,
    AUTHORIZED_MESSAGE,
};
use crate::core::error::Result;
use axum::{extract::State, http::StatusCode, Json};

/// Handler for POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let response = state.auth.signup(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /auth/signin
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> Result<Json<TokenResponse>> {
    let response = state.auth.signin(&req.email, &req.password).await?;
    Ok(Json(response))
}

/// Handler for GET /auth/me
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    tracing::info!(email = %user.email, "Identity requested");

    Json(MeResponse {
        message: AUTHORIZED_MESSAGE.to_string(),
        email: user.email,
    })
}
