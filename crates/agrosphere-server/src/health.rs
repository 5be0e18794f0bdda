use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

/// Name reported by the health and root endpoints
pub const SERVICE_NAME: &str = "agrosphere-gateway";

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Welcome document listing the public endpoints
pub fn root_document(health_path: Option<&str>) -> serde_json::Value {
    json!({
        "message": "Welcome to the AgroSphere inference gateway",
        "service": SERVICE_NAME,
        "health": health_path,
        "endpoints": ["POST /api/v1/chat", "POST /api/v1/predict"],
    })
}
