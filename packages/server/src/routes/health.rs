use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::jobs::CrawlJob;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    running_crawls: Vec<CrawlJob>,
}

/// Health check endpoint; also lists crawls still in progress.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        running_crawls: state.jobs.running().await,
    })
}
