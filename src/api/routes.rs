//! API routes

use crate::api::handlers::{health_check, root, AppState};
use crate::auth::handlers::{me, signin, signup};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes
        .merge(protected_routes)
        .with_state(state)
}
