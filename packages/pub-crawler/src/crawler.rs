//! One-hop crawl traversal.
//!
//! The seed page is fetched first and only serves as a link source. Every
//! link found on it is fetched concurrently (bounded by a semaphore), run
//! through the classifier, and its records are streamed to the sink.
//!
//! Extraction is synchronous and happens inside each fetch task; the parsed
//! document never lives across an await point.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::document::PageDocument;
use crate::error::{CrawlError, CrawlResult, FetchError, FetchResult};
use crate::extract::Extractor;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::traits::sink::RecordSink;
use crate::types::{CrawlConfig, Record};

/// URLs already claimed by this crawl.
///
/// Check-and-insert happens under one lock acquisition, so two tasks can
/// never both claim the same URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `url`. Returns false if it was already claimed.
    pub fn insert(&self, url: &Url) -> bool {
        let key = visit_key(url);
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key)
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&visit_key(url))
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn visit_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Counters for one finished crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    /// Distinct links scheduled for fetching
    pub links_discovered: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    /// Pages dropped because they redirected to an already visited URL
    pub pages_skipped: usize,
    pub records_emitted: usize,
    pub cancelled: bool,
}

enum PageOutcome {
    Extracted { url: Url, records: Vec<Record> },
    Failed,
    Skipped,
    Cancelled,
}

/// Crawls a seed page and the pages it links to.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use pub_crawler::{CrawlConfig, Crawler, Extractor, HttpFetcher, MemorySink};
/// use tokio_util::sync::CancellationToken;
///
/// let config = CrawlConfig::default();
/// let fetcher = Arc::new(HttpFetcher::new(&config)?);
/// let crawler = Crawler::new(fetcher, Arc::new(Extractor::default()), config);
/// let sink = MemorySink::new();
/// let summary = crawler
///     .crawl("https://brewery.example/beers", &sink, CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<Extractor>,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: Arc<Extractor>, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Run one crawl from `seed`, streaming records into `sink`.
    ///
    /// Fails only if the seed URL is invalid, the seed fetch fails, or the
    /// crawl is cancelled before the seed arrives. Cancelling later stops
    /// the crawl early and returns the partial summary with `cancelled` set.
    pub async fn crawl(
        &self,
        seed: &str,
        sink: &dyn RecordSink,
        cancel: CancellationToken,
    ) -> CrawlResult<CrawlSummary> {
        let seed_url = parse_seed(seed)?;
        info!(
            seed = %seed_url,
            fetcher = self.fetcher.name(),
            concurrency = self.config.concurrency,
            "Starting crawl"
        );

        let visited = Arc::new(VisitedSet::new());
        visited.insert(&seed_url);

        let seed_page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
            result = fetch_with_deadline(self.fetcher.as_ref(), &seed_url, self.config.fetch_timeout) => {
                result.map_err(CrawlError::SeedFetch)?
            }
        };
        visited.insert(&seed_page.final_url);

        let links = self.discover_links(&seed_page, &visited);
        let mut summary = CrawlSummary {
            seed_url: seed_url.to_string(),
            links_discovered: links.len(),
            ..Default::default()
        };
        debug!(seed = %seed_page.final_url, links = links.len(), "Discovered links");

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let (tx, mut rx) = mpsc::channel(self.config.concurrency.max(1) * 2);

        for link in links {
            let task = PageTask {
                url: link,
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                visited: Arc::clone(&visited),
                semaphore: Arc::clone(&semaphore),
                cancel: cancel.clone(),
                timeout: self.config.fetch_timeout,
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = task.run().await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            match outcome {
                PageOutcome::Extracted { url, records } => {
                    summary.pages_fetched += 1;
                    if records.is_empty() || cancel.is_cancelled() {
                        continue;
                    }
                    match sink.accept(&records).await {
                        Ok(()) => summary.records_emitted += records.len(),
                        Err(e) => warn!(url = %url, error = %e, "Record sink rejected page"),
                    }
                }
                PageOutcome::Failed => summary.pages_failed += 1,
                PageOutcome::Skipped => summary.pages_skipped += 1,
                PageOutcome::Cancelled => {}
            }
        }

        if let Err(e) = sink.flush().await {
            warn!(error = %e, "Record sink flush failed");
        }

        summary.cancelled = cancel.is_cancelled();
        info!(
            seed = %summary.seed_url,
            links = summary.links_discovered,
            fetched = summary.pages_fetched,
            failed = summary.pages_failed,
            skipped = summary.pages_skipped,
            records = summary.records_emitted,
            cancelled = summary.cancelled,
            "Crawl complete"
        );
        Ok(summary)
    }

    /// Links on the seed page that this crawl will follow, each claimed in
    /// the visited set.
    fn discover_links(&self, seed_page: &FetchedPage, visited: &VisitedSet) -> Vec<Url> {
        let links = PageDocument::parse(seed_page.final_url.clone(), &seed_page.body).links();
        let seed_host = seed_page.final_url.host_str();
        let cap = self.config.max_links.unwrap_or(usize::MAX);

        links
            .into_iter()
            .filter(|link| !self.config.same_host_only || link.host_str() == seed_host)
            .filter(|link| visited.insert(link))
            .take(cap)
            .collect()
    }
}

struct PageTask {
    url: Url,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<Extractor>,
    visited: Arc<VisitedSet>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    timeout: Duration,
}

impl PageTask {
    async fn run(self) -> PageOutcome {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return PageOutcome::Cancelled,
            permit = Arc::clone(&self.semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return PageOutcome::Cancelled,
            },
        };

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return PageOutcome::Cancelled,
            result = fetch_with_deadline(self.fetcher.as_ref(), &self.url, self.timeout) => result,
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Skipping URL");
                return PageOutcome::Failed;
            }
        };

        if page.final_url != self.url && !self.visited.insert(&page.final_url) {
            debug!(url = %self.url, final_url = %page.final_url, "Redirect target already visited");
            return PageOutcome::Skipped;
        }

        let records = self.extractor.extract_html(page.final_url.clone(), &page.body);
        PageOutcome::Extracted {
            url: page.final_url,
            records,
        }
    }
}

async fn fetch_with_deadline(
    fetcher: &dyn Fetcher,
    url: &Url,
    timeout: Duration,
) -> FetchResult<FetchedPage> {
    match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
        }),
    }
}

fn parse_seed(seed: &str) -> CrawlResult<Url> {
    let invalid = || CrawlError::InvalidSeed {
        url: seed.to_string(),
    };
    let mut url = Url::parse(seed.trim()).map_err(|_| invalid())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid());
    }
    url.set_fragment(None);
    Ok(url)
}
