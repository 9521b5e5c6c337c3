//! Background crawl jobs.
//!
//! Each accepted crawl runs in its own tokio task with a cancellation token
//! derived from the server's shutdown token. Running jobs are tracked by id
//! so they can be cancelled individually.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use pub_crawler::{CrawlError, Crawler, RecordSink};

/// A crawl that has been accepted and not yet finished.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlJob {
    pub id: Uuid,
    pub url: String,
    pub started_at: DateTime<Utc>,
}

struct RunningJob {
    job: CrawlJob,
    cancel: CancellationToken,
}

/// Starts crawls and keeps track of the ones still running.
pub struct CrawlJobs {
    crawler: Crawler,
    sink: Arc<dyn RecordSink>,
    shutdown: CancellationToken,
    running: Arc<RwLock<HashMap<Uuid, RunningJob>>>,
}

impl CrawlJobs {
    pub fn new(crawler: Crawler, sink: Arc<dyn RecordSink>, shutdown: CancellationToken) -> Self {
        Self {
            crawler,
            sink,
            shutdown,
            running: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Spawn a crawl of `url` and return immediately.
    pub async fn start(&self, url: String) -> CrawlJob {
        let job = CrawlJob {
            id: Uuid::new_v4(),
            url,
            started_at: Utc::now(),
        };
        let cancel = self.shutdown.child_token();

        // Register before spawning so a fast crawl cannot finish first
        self.running.write().await.insert(
            job.id,
            RunningJob {
                job: job.clone(),
                cancel: cancel.clone(),
            },
        );

        let crawler = self.crawler.clone();
        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);
        let spawned = job.clone();

        tokio::spawn(async move {
            info!(job_id = %spawned.id, url = %spawned.url, "Crawl job started");
            match crawler.crawl(&spawned.url, sink.as_ref(), cancel).await {
                Ok(summary) => info!(
                    job_id = %spawned.id,
                    records = summary.records_emitted,
                    pages = summary.pages_fetched,
                    cancelled = summary.cancelled,
                    "Crawl job finished"
                ),
                Err(CrawlError::Cancelled) => info!(job_id = %spawned.id, "Crawl job cancelled"),
                Err(e) => error!(job_id = %spawned.id, error = %e, "Crawl job failed"),
            }
            running.write().await.remove(&spawned.id);
        });

        job
    }

    /// Cancel a running job. Returns false if no such job is running.
    pub async fn cancel(&self, id: Uuid) -> bool {
        match self.running.read().await.get(&id) {
            Some(running) => {
                running.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Jobs still running, oldest first.
    pub async fn running(&self) -> Vec<CrawlJob> {
        let mut jobs: Vec<CrawlJob> = self
            .running
            .read()
            .await
            .values()
            .map(|r| r.job.clone())
            .collect();
        jobs.sort_by_key(|j| j.started_at);
        jobs
    }

    pub async fn running_count(&self) -> usize {
        self.running.read().await.len()
    }

    /// Cancel every job, running or future.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
