use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;
use uuid::Uuid;

use super::ApiError;
use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlAccepted {
    pub url: String,
    pub job_id: Uuid,
    pub msg: String,
}

/// Start a crawl in the background.
///
/// Returns 202 as soon as the job is spawned; records go to the configured
/// sink as pages are extracted. Rejects URLs that are not absolute http(s).
pub async fn start_crawl_handler(
    State(state): State<AppState>,
    Json(request): Json<CrawlRequest>,
) -> Result<(StatusCode, Json<CrawlAccepted>), ApiError> {
    let url = request.url.trim();
    let valid = Url::parse(url)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false);
    if !valid {
        return Err(ApiError::InvalidUrl(request.url.clone()));
    }

    let job = state.jobs.start(url.to_string()).await;
    info!(job_id = %job.id, url = %job.url, "Accepted crawl request");

    Ok((
        StatusCode::ACCEPTED,
        Json(CrawlAccepted {
            url: job.url,
            job_id: job.id,
            msg: "Starting Crawl...".to_string(),
        }),
    ))
}

/// Cancel a running crawl. In-flight pages are abandoned.
pub async fn cancel_crawl_handler(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.jobs.cancel(job_id).await {
        info!(job_id = %job_id, "Cancelled crawl");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::JobNotFound(job_id))
    }
}
