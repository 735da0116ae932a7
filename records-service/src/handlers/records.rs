use crate::models::RetrieveRequest;
use crate::services::metrics::record_search;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;
use std::time::Instant;

/// Retrieve patient records matching a free-text query.
///
/// The query is matched against the `name`, `conditions` and `diagnostics`
/// fields; the raw hit list comes back as a JSON array.
pub async fn retrieve(
    State(state): State<AppState>,
    Json(request): Json<RetrieveRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Absent and empty are rejected alike; anything else goes to the backend.
    let query = request.query.unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Query is required")));
    }

    let backend = state.search.name();
    let start = Instant::now();
    match state.search.search(&query).await {
        Ok(hits) => {
            record_search("ok", backend, start.elapsed().as_secs_f64());
            tracing::info!(hits = hits.len(), "Search completed");
            Ok(Json(hits))
        }
        Err(e) => {
            record_search("error", backend, start.elapsed().as_secs_f64());
            tracing::error!(error = %e, "Search request failed");
            Err(AppError::InternalError(anyhow::anyhow!(
                "Error retrieving data: {}",
                e
            )))
        }
    }
}
