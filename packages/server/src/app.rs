//! Application setup.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::jobs::CrawlJobs;
use crate::routes::{cancel_crawl_handler, health_handler, start_crawl_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<CrawlJobs>,
}

impl AppState {
    pub fn new(jobs: CrawlJobs) -> Self {
        Self {
            jobs: Arc::new(jobs),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/crawl", post(start_crawl_handler))
        .route("/crawl/:job_id", delete(cancel_crawl_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
