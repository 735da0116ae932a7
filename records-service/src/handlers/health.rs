use crate::services;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Home endpoint describing the available routes.
pub async fn home() -> impl IntoResponse {
    Json(json!({
        "message": "Patient records search and summarization API.",
        "endpoints": {
            "/retrieve": "POST - Retrieve patient records from the search index.",
            "/generate-summary": "POST - Generate a summary for retrieved patient data.",
            "/health": "GET - Check the health of the server."
        }
    }))
}

/// Liveness probe. Always 200 while the process can answer HTTP.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "The server is running.",
        "service": "records-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: verifies the search backend is reachable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.search.ping().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus exposition endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        services::get_metrics(),
    )
}
