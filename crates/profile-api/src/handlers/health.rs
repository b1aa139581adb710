use axum::Json;
use serde_json::{json, Value};

/// Liveness check - GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "profile-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
