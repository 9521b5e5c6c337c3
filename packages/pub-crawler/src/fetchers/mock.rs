//! Mock fetcher for testing.
//!
//! Serves canned pages from memory. Unknown URLs answer 404.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, Fetcher};

/// Redirect chains longer than this fail like a redirect loop.
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone)]
enum MockResponse {
    Page(String),
    Redirect(Url),
    Status(u16),
    Timeout,
}

/// In-memory site.
///
/// Clones share the same pages and call log, so a test can hand one clone
/// to the crawler and inspect the other afterwards.
///
/// # Example
///
/// ```rust
/// use pub_crawler::fetchers::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://brewery.example/", "<a href='/beers/stout'>Stout</a>")
///     .with_page("https://brewery.example/beers/stout", "<h1>Stout</h1>");
/// assert_eq!(mock.page_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    pub fn add_page(&self, url: &str, body: impl Into<String>) {
        self.insert(url, MockResponse::Page(body.into()));
    }

    /// Redirect `from` to `to`.
    pub fn add_redirect(&self, from: &str, to: &str) {
        if let Ok(target) = Url::parse(to) {
            self.insert(from, MockResponse::Redirect(target));
        }
    }

    /// Answer `url` with an HTTP error status.
    pub fn add_status(&self, url: &str, status: u16) {
        self.insert(url, MockResponse::Status(status));
    }

    /// Make `url` time out.
    pub fn add_timeout(&self, url: &str) {
        self.insert(url, MockResponse::Timeout);
    }

    pub fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.add_page(url, body);
        self
    }

    pub fn with_redirect(self, from: &str, to: &str) -> Self {
        self.add_redirect(from, to);
        self
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.add_status(url, status);
        self
    }

    pub fn with_timeout(self, url: &str) -> Self {
        self.add_timeout(url);
        self
    }

    /// Sleep this long before answering every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn page_count(&self) -> usize {
        self.read_responses().len()
    }

    /// URLs requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// How many times `url` was requested.
    pub fn calls_to(&self, url: &str) -> usize {
        let key = normalize(url);
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| **c == key)
            .count()
    }

    fn insert(&self, url: &str, response: MockResponse) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize(url), response);
    }

    fn read_responses(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, MockResponse>> {
        self.responses.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, url: &Url) -> FetchResult<FetchedPage> {
        let responses = self.read_responses();
        let mut current = url.clone();

        for _ in 0..=MAX_REDIRECTS {
            match responses.get(current.as_str()) {
                Some(MockResponse::Page(body)) => return Ok(FetchedPage::new(current, body.clone())),
                Some(MockResponse::Redirect(target)) => current = target.clone(),
                Some(MockResponse::Status(status)) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: *status,
                    })
                }
                Some(MockResponse::Timeout) => {
                    return Err(FetchError::Timeout {
                        url: url.to_string(),
                    })
                }
                None => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: 404,
                    })
                }
            }
        }

        Err(FetchError::Http {
            url: url.to_string(),
            source: "too many redirects".into(),
        })
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.resolve(url)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Canonical string form, so "https://a.example" and "https://a.example/"
/// are the same key.
fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
