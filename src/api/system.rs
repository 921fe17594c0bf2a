use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::{HealthDto, PreviewDto};
use super::{ApiResponse, AppState};

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(HealthDto {
        status: "ok",
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// GET /preview
pub async fn preview(State(state): State<Arc<AppState>>) -> Json<ApiResponse<PreviewDto>> {
    let catalog = &state.config().catalog;

    Json(ApiResponse::success(PreviewDto {
        title: catalog.preview_title.clone(),
        content: catalog.preview_content.clone(),
        image_url: catalog.preview_image_url.clone(),
    }))
}
