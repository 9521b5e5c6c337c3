//! HTTP trigger surface for the pub crawler.
//!
//! `POST /crawl {url}` starts a background crawl and answers immediately;
//! records are appended to a JSON Lines file as pages are extracted.

pub mod app;
pub mod config;
pub mod jobs;
pub mod routes;

pub use app::{build_app, AppState};
pub use config::Config;
pub use jobs::{CrawlJob, CrawlJobs};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pub_crawler=debug,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
