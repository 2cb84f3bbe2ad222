//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Request tracing middleware
//! - Server lifecycle and graceful shutdown

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use middleware::{trace_id_middleware, TraceId, TRACE_ID_HEADER};
pub use routes::build_api_routes;
pub use server::ApiServer;
