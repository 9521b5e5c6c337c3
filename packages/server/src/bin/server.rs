// Main entry point for the crawl trigger server

use std::sync::Arc;

use anyhow::{Context, Result};
use pub_crawler::{Crawler, Extractor, HttpFetcher, JsonlSink};
use server_core::{build_app, init_tracing, AppState, Config, CrawlJobs};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    tracing::info!("Starting pub crawler server");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(records = %config.records_path.display(), "Configuration loaded");

    let fetcher = HttpFetcher::new(&config.crawl).context("Failed to build HTTP client")?;
    let crawler = Crawler::new(
        Arc::new(fetcher),
        Arc::new(Extractor::default()),
        config.crawl.clone(),
    );
    let sink = JsonlSink::open(&config.records_path)
        .await
        .context("Failed to open records file")?;

    let shutdown = CancellationToken::new();
    let jobs = CrawlJobs::new(crawler, Arc::new(sink), shutdown.clone());
    let app = build_app(AppState::new(jobs));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down, cancelling running crawls");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    Ok(())
}
