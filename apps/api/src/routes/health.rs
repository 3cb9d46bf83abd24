use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvfill"
    }))
}

/// GET /
/// Describes the service and its endpoints.
pub async fn service_info_handler() -> Json<Value> {
    Json(json!({
        "message": "CV Filler API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/fill-cv/": "Fill CV from uploaded template and JSON file",
            "/fill-cv-from-data/": "Fill CV from uploaded template and JSON form field",
            "/health": "Liveness probe"
        }
    }))
}
