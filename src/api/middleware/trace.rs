use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

tokio::task_local! {
    static CURRENT_TRACE_ID: String;
}

/// Trace ID of the request being handled on this task, if any.
///
/// Error responses use it so the body and the `X-Trace-Id` header agree.
pub fn current_trace_id() -> Option<String> {
    CURRENT_TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Middleware that assigns each request a trace ID.
///
/// A well-formed UUID in the incoming `X-Trace-Id` header is reused so a
/// caller can correlate its own logs; anything else gets a fresh UUID v4.
/// The ID is attached to the request span, the request extensions, error
/// bodies and the response headers.
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    request.extensions_mut().insert(TraceId(trace_id.clone()));

    let response = CURRENT_TRACE_ID
        .scope(
            trace_id.clone(),
            async move {
                tracing::info!("Request started");
                let response = next.run(request).await;
                tracing::info!(status = %response.status(), "Request completed");
                response
            }
            .instrument(span),
        )
        .await;

    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        parts.headers.insert(TRACE_ID_HEADER, value);
    }

    Response::from_parts(parts, body)
}

/// Extension type for storing trace ID in request extensions
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AppError, ErrorResponse};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn echo_trace_id(request: Request<Body>) -> impl IntoResponse {
        let trace_id = request
            .extensions()
            .get::<TraceId>()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "no-trace-id".to_string());

        (StatusCode::OK, trace_id)
    }

    async fn failing() -> Result<&'static str, AppError> {
        Err(AppError::unauthorized("Not authenticated"))
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo_trace_id))
            .route("/fail", get(failing))
            .layer(middleware::from_fn(trace_id_middleware))
    }

    fn header_of(response: &Response) -> String {
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_trace_id_generated_and_exposed() {
        let response = app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header_trace_id = header_of(&response);
        assert!(Uuid::parse_str(&header_trace_id).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header_trace_id);
    }

    #[tokio::test]
    async fn test_incoming_trace_id_is_reused() {
        let incoming = Uuid::new_v4().to_string();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(TRACE_ID_HEADER, &incoming)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(header_of(&response), incoming);
    }

    #[tokio::test]
    async fn test_garbage_trace_id_is_replaced() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(TRACE_ID_HEADER, "not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(header_of(&response), "not-a-uuid");
    }

    #[tokio::test]
    async fn test_error_body_carries_request_trace_id() {
        let response = app()
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let header_trace_id = header_of(&response);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.trace_id, header_trace_id);
    }

    #[test]
    fn test_no_trace_id_outside_request() {
        assert!(current_trace_id().is_none());
    }
}
