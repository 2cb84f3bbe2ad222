use axum::Json;
use serde_json::{json, Value};

/// Handler for GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Interview With AI backend is running" }))
}

/// Handler for GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root() {
        let Json(value) = root().await;
        assert_eq!(value["message"], "Interview With AI backend is running");
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(value) = health_check().await;

        assert_eq!(value["status"], "ok");
        assert!(value["version"].is_string());
        assert!(value["timestamp"].is_number());
    }
}
