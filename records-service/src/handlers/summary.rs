use crate::models::{SummaryRequest, SummaryResponse};
use crate::services::metrics::record_summary;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;
use std::time::Instant;

/// Generate a summary for raw medical test data.
pub async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Absent and empty are rejected alike; anything else goes to the model.
    let content = request.content.unwrap_or_default();
    if content.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Content is required")));
    }

    let model = state.config.summarizer.model_id.clone();
    let start = Instant::now();
    match state.summarizer.summarize(&content).await {
        Ok(summary) => {
            record_summary("ok", &model, start.elapsed().as_secs_f64());
            tracing::info!(
                content_len = content.len(),
                summary_len = summary.len(),
                "Summary generated"
            );
            Ok(Json(SummaryResponse { summary }))
        }
        Err(e) => {
            record_summary("error", &model, start.elapsed().as_secs_f64());
            tracing::error!(error = %e, "Summary generation failed");
            Err(AppError::InternalError(anyhow::anyhow!(
                "Error generating summary: {}",
                e
            )))
        }
    }
}
